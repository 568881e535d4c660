use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use ds_content_fs::TOOL_ICONS;

#[derive(Debug, Parser)]
#[command(name = "devsite", version, about = "Developer blog, tools directory, comments and likes")]
pub struct Cli {
    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the site.
    Serve,
    /// Create `blog/<slug>/index.md` in the content directory, dated today.
    NewPost {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        excerpt: String,
        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(long)]
        author: Option<String>,
        /// Defaults to one derived from the title.
        #[arg(long)]
        slug: Option<String>,
    },
    /// Declare a tool in `tools.toml`.
    NewTool {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Comma-separated tags, e.g. `Frontend,CSS`.
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(long, default_value = "Code2", value_parser = PossibleValuesParser::new(TOOL_ICONS))]
        icon: String,
        /// Defaults to one derived from the title.
        #[arg(long)]
        slug: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["devsite"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_new_post_arguments() {
        let cli = Cli::try_parse_from([
            "devsite",
            "new-post",
            "--title",
            "Hello World",
            "--tags",
            "Rust,Web",
        ])
        .unwrap();
        match cli.command {
            Some(Command::NewPost { title, tags, slug, excerpt, .. }) => {
                assert_eq!(title, "Hello World");
                assert_eq!(tags, ["Rust", "Web"]);
                assert!(slug.is_none());
                assert!(excerpt.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_new_tool_checks_icon() {
        let base = ["devsite", "new-tool", "--title", "T", "--description", "D"];
        assert!(Cli::try_parse_from(base.iter().chain(&["--icon", "Rocket"])).is_err());

        let cli = Cli::try_parse_from(base).unwrap();
        match cli.command {
            Some(Command::NewTool { icon, .. }) => assert_eq!(icon, "Code2"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
