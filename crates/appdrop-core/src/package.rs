//! Package kind detection.
//!
//! The server matches packages by the last four characters of the file name,
//! so the same naive rule is used here instead of a real extension parser:
//! `setup.msi` and `setup.MSI` are different extensions, and `bundle.appx`
//! yields `appx`.

/// Last four characters of `file_name`, or the whole name when shorter.
pub fn file_extension(file_name: &str) -> &str {
    let char_count = file_name.chars().count();
    if char_count <= 4 {
        return file_name;
    }
    let start = file_name
        .char_indices()
        .nth(char_count - 4)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &file_name[start..]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    Msi,
    Exe,
    Zip,
    Other,
}

impl PackageKind {
    pub fn from_file_name(file_name: &str) -> Self {
        match file_extension(file_name) {
            ".MSI" => PackageKind::Msi,
            ".EXE" => PackageKind::Exe,
            ".ZIP" => PackageKind::Zip,
            _ => PackageKind::Other,
        }
    }

    /// Installer packages carry a structured major/minor/build/revision
    /// version instead of a flat version string.
    pub fn requires_structured_version(self) -> bool {
        matches!(self, PackageKind::Exe | PackageKind::Zip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_last_four_chars() {
        assert_eq!(file_extension("Agent.MSI"), ".MSI");
        assert_eq!(file_extension("bundle.appx"), "appx");
        assert_eq!(file_extension("a.7z"), "a.7z");
        assert_eq!(file_extension(""), "");
    }

    #[test]
    fn extension_handles_multibyte_names() {
        assert_eq!(file_extension("Outil-été.EXE"), ".EXE");
        assert_eq!(file_extension("日本語版本.ZIP"), ".ZIP");
    }

    #[test]
    fn kind_matching_is_case_sensitive() {
        assert_eq!(PackageKind::from_file_name("Agent.MSI"), PackageKind::Msi);
        assert_eq!(PackageKind::from_file_name("Setup.EXE"), PackageKind::Exe);
        assert_eq!(PackageKind::from_file_name("Tools.ZIP"), PackageKind::Zip);
        assert_eq!(PackageKind::from_file_name("setup.exe"), PackageKind::Other);
        assert_eq!(PackageKind::from_file_name("app.msix"), PackageKind::Other);
    }

    #[test]
    fn only_installers_need_structured_versions() {
        assert!(PackageKind::Exe.requires_structured_version());
        assert!(PackageKind::Zip.requires_structured_version());
        assert!(!PackageKind::Msi.requires_structured_version());
        assert!(!PackageKind::Other.requires_structured_version());
    }
}
