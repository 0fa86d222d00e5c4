//! `risorls install-hint`: print the manual install command.
//!
//! Nothing is executed. The printed command is the one automated
//! installation would run with the current settings.

use crate::bootstrap::CliContext;

/// The install command for the configured toolchain, module and version.
pub fn install_command(ctx: &CliContext) -> String {
    let settings = ctx.resolver.settings();
    settings
        .toolchain
        .install_command(&ctx.request.install_ref, settings.install_timeout)
        .display()
}

pub fn execute(ctx: &CliContext) -> i32 {
    println!("{}", install_command(ctx));
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap};
    use risorls_core::Settings;

    #[test]
    fn test_default_install_command() {
        let ctx = bootstrap(CliConfig::with_defaults());
        assert_eq!(
            install_command(&ctx),
            "go install github.com/risor-io/risor/cmd/risor-lsp@v1.8.1"
        );
    }

    #[test]
    fn test_install_command_follows_settings() {
        let overrides = Settings {
            toolchain_program: Some("/usr/local/go/bin/go".to_string()),
            install_version: Some("v1.9.0".to_string()),
            ..Settings::default()
        };
        let ctx = bootstrap(CliConfig::layered(None, &overrides).unwrap());
        assert_eq!(
            install_command(&ctx),
            "/usr/local/go/bin/go install github.com/risor-io/risor/cmd/risor-lsp@v1.9.0"
        );
    }
}
