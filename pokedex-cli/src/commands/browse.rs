use std::io::{BufRead, Write};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pokedex_api::PokeApiClient;
use pokedex_lib::{CatalogSession, JsonFavorites};

use super::list::{load_with_spinner, print_page};
use super::{AppContext, runtime};
use crate::error::CliError;

#[derive(Debug, PartialEq, Eq)]
enum BrowseCommand {
    Next,
    Previous,
    Goto(u32),
    Reload,
    Quit,
}

fn parse_command(line: &str) -> Option<BrowseCommand> {
    let mut parts = line.split_whitespace();
    let cmd = match parts.next() {
        None => return Some(BrowseCommand::Next),
        Some(cmd) => cmd.to_lowercase(),
    };
    match cmd.as_str() {
        "n" | "next" => Some(BrowseCommand::Next),
        "p" | "prev" | "previous" => Some(BrowseCommand::Previous),
        "g" | "go" | "goto" => parts
            .next()
            .and_then(|n| n.parse().ok())
            .map(BrowseCommand::Goto),
        "r" | "reload" => Some(BrowseCommand::Reload),
        "q" | "quit" | "exit" => Some(BrowseCommand::Quit),
        _ => None,
    }
}

/// Page through the catalog, reading navigation commands from stdin.
///
/// The runtime keeps running between prompts, so the next page is usually
/// already cached by the time the user asks for it.
pub(crate) fn run_browse(ctx: &AppContext) -> Result<(), CliError> {
    let rt = runtime()?;
    let session = ctx.session()?;
    let favorites = ctx.favorites()?;

    let result = browse_loop(ctx, &rt, &session, &favorites);
    session.shutdown();
    result
}

fn browse_loop(
    ctx: &AppContext,
    rt: &tokio::runtime::Runtime,
    session: &CatalogSession<PokeApiClient>,
    favorites: &JsonFavorites,
) -> Result<(), CliError> {
    let mut paginator = session.paginator();
    let stdin = std::io::stdin();
    let mut reload = true;

    loop {
        if reload {
            match rt.block_on(load_with_spinner(&mut paginator, ctx.quiet)) {
                Ok(result) => print_page(&paginator, &result, favorites),
                Err(e) => log::warn!("Page {}: {}", paginator.current_page(), e),
            }
        }

        print!(
            "\n{} ",
            "[n]ext  [p]rev  [g N]  [r]eload  [q]uit >".if_supports_color(Stdout, |t| t.dimmed())
        );
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        reload = true;
        match parse_command(&line) {
            Some(BrowseCommand::Next) => {
                if !paginator.go_to_next() {
                    log::warn!("Already on the last page");
                    reload = false;
                }
            }
            Some(BrowseCommand::Previous) => {
                if !paginator.go_to_previous() {
                    log::warn!("Already on the first page");
                    reload = false;
                }
            }
            Some(BrowseCommand::Goto(page)) => paginator.go_to_page(page),
            Some(BrowseCommand::Reload) => paginator.invalidate(),
            Some(BrowseCommand::Quit) => return Ok(()),
            None => {
                log::warn!("Unknown command: {}", line.trim());
                reload = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_means_next() {
        assert_eq!(parse_command("\n"), Some(BrowseCommand::Next));
        assert_eq!(parse_command("N"), Some(BrowseCommand::Next));
    }

    #[test]
    fn goto_needs_a_number() {
        assert_eq!(parse_command("g 12"), Some(BrowseCommand::Goto(12)));
        assert_eq!(parse_command("goto"), None);
        assert_eq!(parse_command("g twelve"), None);
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert_eq!(parse_command("jump"), None);
        assert_eq!(parse_command("q"), Some(BrowseCommand::Quit));
        assert_eq!(parse_command("prev"), Some(BrowseCommand::Previous));
    }
}
