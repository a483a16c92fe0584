//! Standard Windows Installer texts for well-known exit codes.

/// Look up the platform's description of an installer exit code.
pub fn describe(code: i32) -> Option<&'static str> {
    let text = match code {
        0 => "The action completed successfully.",
        13 => "The data is invalid.",
        87 => "One of the parameters was invalid.",
        1601 => "The Windows Installer service could not be accessed.",
        1602 => "User cancelled installation.",
        1603 => "Fatal error during installation.",
        1604 => "Installation suspended, incomplete.",
        1605 => "This action is only valid for products that are currently installed.",
        1608 => "Unknown property.",
        1612 => "The installation source for this product is not available.",
        1614 => "Product is uninstalled.",
        1618 => "Another installation is already in progress.",
        1619 => "This installation package could not be opened.",
        1620 => "This installation package could not be opened. The package is not valid.",
        1624 => "Error applying transforms.",
        1625 => "This installation is forbidden by system policy.",
        1633 => "This installation package is not supported by this processor type.",
        1638 => "Another version of this product is already installed.",
        1639 => "Invalid command line argument.",
        1641 => "The requested operation completed successfully. The system will be restarted.",
        1642 => "The upgrade cannot be installed because the program to be upgraded may be missing.",
        1707 => "Installation operation completed successfully.",
        3010 => "A restart is required to complete the install.",
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::describe;

    #[test]
    fn known_and_unknown_codes() {
        assert_eq!(
            describe(1618),
            Some("Another installation is already in progress.")
        );
        assert!(describe(3010).unwrap().contains("restart"));
        assert_eq!(describe(-5), None);
    }
}
