//! Confirmation before a bulk uninstall.

use std::io::Write;

use anyhow::{Result, bail};
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};

use setupctl_core::inventory::UninstallCandidate;

/// Lists the products about to be removed and asks for confirmation.
pub struct ConfirmPrompt<W: Write> {
    writer: W,
    assume_yes: bool,
    interactive: bool,
    theme: ColorfulTheme,
}

impl<W: Write> ConfirmPrompt<W> {
    pub fn new(writer: W, assume_yes: bool) -> Self {
        Self {
            writer,
            assume_yes,
            interactive: true,
            theme: ColorfulTheme::default(),
        }
    }

    /// Whether a terminal is attached to answer the prompt.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn confirm(&mut self, pattern: &str, candidates: &[UninstallCandidate]) -> Result<bool> {
        self.print_candidates(pattern, candidates)?;

        if self.assume_yes {
            return Ok(true);
        }
        if !self.interactive {
            bail!("no terminal to confirm the uninstall on; pass --yes to proceed unattended");
        }

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(format!("Uninstall {} product(s)?", candidates.len()))
            .default(false)
            .interact()?;

        Ok(confirmed)
    }

    fn print_candidates(&mut self, pattern: &str, candidates: &[UninstallCandidate]) -> Result<()> {
        writeln!(
            self.writer,
            "{} '{}':",
            style("Installed products matching").bold(),
            pattern
        )?;
        for candidate in candidates {
            writeln!(
                self.writer,
                "  {} {} ({})",
                style(&candidate.display_name).green(),
                candidate.product_code,
                candidate.location
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use setupctl_core::inventory::{InventoryLocation, ProductCode};

    fn candidate(name: &str, code: &str) -> UninstallCandidate {
        UninstallCandidate {
            product_code: ProductCode::parse(code).unwrap(),
            display_name: name.to_string(),
            location: InventoryLocation::Native,
        }
    }

    #[test]
    fn assume_yes_skips_the_prompt_and_lists_candidates() {
        let candidates = vec![
            candidate("Java 8 Update 351", "{26A24AE4-039D-4CA4-87B4-2F32180351F0}"),
            candidate("Java 8 Update 361", "{26A24AE4-039D-4CA4-87B4-2F32180361F0}"),
        ];
        let mut out = Vec::new();
        let confirmed = ConfirmPrompt::new(&mut out, true)
            .confirm("Java 8", &candidates)
            .unwrap();

        assert!(confirmed);
        let text = String::from_utf8(out).unwrap();
        let text = console::strip_ansi_codes(&text);
        assert!(text.contains("'Java 8'"));
        assert!(text.contains("Java 8 Update 351 {26A24AE4-039D-4CA4-87B4-2F32180351F0}"));
        assert!(text.contains("Java 8 Update 361"));
    }

    #[test]
    fn without_a_terminal_the_prompt_fails_and_names_yes() {
        let candidates = vec![candidate(
            "Java 8 Update 351",
            "{26A24AE4-039D-4CA4-87B4-2F32180351F0}",
        )];
        let mut out = Vec::new();
        let err = ConfirmPrompt::new(&mut out, false)
            .with_interactive(false)
            .confirm("Java 8", &candidates)
            .unwrap_err();

        assert!(err.to_string().contains("--yes"));
        let text = String::from_utf8(out).unwrap();
        assert!(console::strip_ansi_codes(&text).contains("Java 8 Update 351"));
    }

    #[test]
    fn assume_yes_wins_without_a_terminal() {
        let candidates = vec![candidate(
            "Java 8 Update 351",
            "{26A24AE4-039D-4CA4-87B4-2F32180351F0}",
        )];
        let confirmed = ConfirmPrompt::new(Vec::new(), true)
            .with_interactive(false)
            .confirm("Java 8", &candidates)
            .unwrap();
        assert!(confirmed);
    }
}
