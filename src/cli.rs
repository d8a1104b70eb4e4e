use crate::core::commands::PublishTarget;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "plugin_discord_bot")]
#[command(about = "Discord bot that loads its commands and events from plugin folders", long_about = None)]
pub struct Cli {
    /// Publish the commands globally (and to every guild the bot is in)
    #[arg(short = 'L', long, conflicts_with_all = ["guild", "no_upload"])]
    pub global: bool,

    /// Publish the commands to this guild only (defaults to BASE_GUILD_ID)
    #[arg(short, long, value_name = "GUILD_ID", value_parser = clap::value_parser!(u64).range(1..))]
    pub guild: Option<u64>,

    /// Start without publishing commands
    #[arg(long, conflicts_with = "guild")]
    pub no_upload: bool,

    /// Plugin folder (overrides PLUGINS_PATH)
    #[arg(short, long, value_name = "DIR")]
    pub plugins: Option<PathBuf>,
}

impl Cli {
    /// Where commands go after login, or `None` to skip publication.
    ///
    /// Without flags the base guild is used when configured, otherwise the
    /// commands are published globally.
    pub fn publish_target(&self, base_guild_id: Option<u64>) -> Option<PublishTarget> {
        if self.no_upload {
            return None;
        }
        if self.global {
            return Some(PublishTarget::Global);
        }

        match self.guild.or(base_guild_id) {
            Some(guild_id) => Some(PublishTarget::Guild(guild_id)),
            None => Some(PublishTarget::Global),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["plugin_discord_bot"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn global_flag_wins_over_base_guild() {
        let cli = parse(&["-L"]);
        assert_eq!(cli.publish_target(Some(5)), Some(PublishTarget::Global));
    }

    #[test]
    fn defaults_to_base_guild_then_global() {
        let cli = parse(&[]);
        assert_eq!(cli.publish_target(Some(5)), Some(PublishTarget::Guild(5)));
        assert_eq!(cli.publish_target(None), Some(PublishTarget::Global));
    }

    #[test]
    fn explicit_guild_overrides_base_guild() {
        let cli = parse(&["--guild", "42"]);
        assert_eq!(cli.publish_target(Some(5)), Some(PublishTarget::Guild(42)));
    }

    #[test]
    fn no_upload_skips_publication() {
        let cli = parse(&["--no-upload"]);
        assert_eq!(cli.publish_target(Some(5)), None);
    }

    #[test]
    fn conflicting_flags_are_rejected() {
        assert!(Cli::try_parse_from(["bot", "-L", "--guild", "42"]).is_err());
        assert!(Cli::try_parse_from(["bot", "-L", "--no-upload"]).is_err());
        assert!(Cli::try_parse_from(["bot", "--guild", "0"]).is_err());
    }

    #[test]
    fn plugins_dir_override() {
        let cli = parse(&["--plugins", "/tmp/plugins"]);
        assert_eq!(cli.plugins, Some(PathBuf::from("/tmp/plugins")));
    }
}
