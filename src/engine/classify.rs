//! Magic-number classification of decoded byte buffers.
//!
//! Only prefix magics are examined; there is no structured header parsing
//! here. Check order matters: `CA FE BA BE` is both the Java class-file
//! magic and a Mach-O fat-binary signature, and this engine resolves the
//! ambiguity in favor of Java.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Executable family recognized from a magic prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum ExecutableType {
    Windows,
    Linux,
    MacOs,
    Java,
    /// No recognized signature.
    None,
    /// The buffer could not be read at all.
    Unknown,
}

impl ExecutableType {
    /// True for variants that identify an actual executable format.
    pub fn is_executable(&self) -> bool {
        !matches!(self, ExecutableType::None | ExecutableType::Unknown)
    }
}

impl fmt::Display for ExecutableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutableType::Windows => "Windows",
            ExecutableType::Linux => "Linux",
            ExecutableType::MacOs => "MacOS",
            ExecutableType::Java => "Java",
            ExecutableType::None => "None",
            ExecutableType::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

const ELF_MAGIC: [u8; 4] = [0x7F, 0x45, 0x4C, 0x46];
const JAVA_MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];
const MACHO_MAGICS: [[u8; 4]; 4] = [
    [0xFE, 0xED, 0xFA, 0xCE],
    [0xFE, 0xED, 0xFA, 0xCF],
    [0xCE, 0xFA, 0xED, 0xFE],
    [0xCF, 0xFA, 0xED, 0xFE],
];
const PE_MAGIC: [u8; 2] = [0x4D, 0x5A];

/// Classify a byte buffer by its magic prefix.
pub fn classify_bytes(data: &[u8]) -> ExecutableType {
    if data.len() < 4 {
        return ExecutableType::None;
    }
    let head4: [u8; 4] = [data[0], data[1], data[2], data[3]];
    if head4 == ELF_MAGIC {
        return ExecutableType::Linux;
    }
    // Java before Mach-O: CAFEBABE is also a fat-binary signature
    if head4 == JAVA_MAGIC {
        return ExecutableType::Java;
    }
    if MACHO_MAGICS.contains(&head4) {
        return ExecutableType::MacOs;
    }
    if data[..2] == PE_MAGIC {
        return ExecutableType::Windows;
    }
    ExecutableType::None
}

/// Classify a file on disk by reading its first bytes.
///
/// Read failures classify as `Unknown`, distinct from `None` (readable but
/// no recognized signature).
pub fn classify_file(path: &Path) -> ExecutableType {
    let mut head = [0u8; 4];
    match std::fs::File::open(path).and_then(|mut f| {
        let n = f.read(&mut head)?;
        Ok(n)
    }) {
        Ok(n) => classify_bytes(&head[..n]),
        Err(_) => ExecutableType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elf_magic_is_linux() {
        assert_eq!(
            classify_bytes(b"\x7fELF\x02\x01\x01\x00"),
            ExecutableType::Linux
        );
    }

    #[test]
    fn java_wins_over_macho() {
        // CAFEBABE is in the Mach-O fat set too; Java must take precedence
        assert_eq!(
            classify_bytes(&[0xCA, 0xFE, 0xBA, 0xBE]),
            ExecutableType::Java
        );
    }

    #[test]
    fn macho_magics() {
        for magic in [
            [0xFEu8, 0xED, 0xFA, 0xCE],
            [0xFE, 0xED, 0xFA, 0xCF],
            [0xCE, 0xFA, 0xED, 0xFE],
            [0xCF, 0xFA, 0xED, 0xFE],
        ] {
            assert_eq!(classify_bytes(&magic), ExecutableType::MacOs);
        }
    }

    #[test]
    fn mz_prefix_is_windows() {
        assert_eq!(classify_bytes(b"MZ\x90\x00\x03"), ExecutableType::Windows);
    }

    #[test]
    fn short_or_plain_buffers_are_none() {
        assert_eq!(classify_bytes(b"MZ"), ExecutableType::None); // < 4 bytes
        assert_eq!(classify_bytes(b""), ExecutableType::None);
        assert_eq!(classify_bytes(b"hello world"), ExecutableType::None);
    }

    #[test]
    fn missing_file_is_unknown() {
        assert_eq!(
            classify_file(Path::new("/no/such/file/anywhere")),
            ExecutableType::Unknown
        );
    }
}
