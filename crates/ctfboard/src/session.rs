//! Interactive line-oriented session.
//!
//! Reads one command per line, feeds the matching [`Event`] to the
//! [`Controller`] and prints the active screen. While waiting for input the
//! session also wakes up when the status message is due to be hidden.

use std::future;
use std::time::Instant;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::controller::{confirmation_prompt, table_for, Controller, Event, FormField, Screen};
use crate::error::Result;
use crate::render::RowAction;
use crate::score::ScoreField;
use crate::storage::RecordStore;

const HELP: &str = "\
Commands:
  tab <participants|leaderboard>     switch screen (alias: nav)
  set <team|captain|email|phone|members> <value>
                                     fill in the registration form
  submit                             register the team in the form
  score <id> <defence|attack|uptime> <value>
                                     edit a result
  delete <id>                        delete the row with this id on the current screen
  yes / no                           answer a pending confirmation
  filter [text]                      filter the current table (no text clears)
  show                               print the current screen again
  help                               show this help
  quit                               leave the session
";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward an event unchanged.
    Event(Event),
    /// Ask to delete a row of the active table.
    Delete(String),
    /// Filter the active table.
    Filter(String),
    /// Print the screen again.
    Show,
    /// Print help.
    Help,
    /// End the session.
    Quit,
    /// Blank line.
    Nothing,
}

/// Parse one input line.
///
/// # Errors
///
/// Returns a user-facing message describing what was wrong with the line.
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "" => Command::Nothing,
        "tab" | "nav" => {
            let screen: Screen = rest.parse().map_err(|e: crate::Error| e.to_string())?;
            if word.eq_ignore_ascii_case("nav") {
                Command::Event(Event::SelectLink(Some(screen)))
            } else {
                Command::Event(Event::SelectTab(screen))
            }
        }
        "set" => {
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = match name.to_ascii_lowercase().as_str() {
                "team" => FormField::TeamName,
                "captain" => FormField::CaptainName,
                "email" => FormField::Email,
                "phone" => FormField::Phone,
                "members" => FormField::Members,
                other => return Err(format!("unknown form field '{other}'")),
            };
            Command::Event(Event::EditForm(field, value.trim().to_string()))
        }
        "submit" => Command::Event(Event::Submit),
        "score" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            let (Some(id), Some(field)) = (parts.next(), parts.next()) else {
                return Err("usage: score <id> <defence|attack|uptime> <value>".to_string());
            };
            let field: ScoreField = field.parse().map_err(|e: crate::Error| e.to_string())?;
            Command::Event(Event::EditScore {
                result_id: id.to_string(),
                field,
                value: parts.next().unwrap_or("").trim().to_string(),
            })
        }
        "delete" if !rest.is_empty() => Command::Delete(rest.to_string()),
        "delete" => return Err("usage: delete <id>".to_string()),
        "yes" | "y" => Command::Event(Event::Confirm),
        "no" | "n" => Command::Event(Event::Cancel),
        "filter" => Command::Filter(rest.to_string()),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (type 'help')")),
    };
    Ok(command)
}

/// Run a session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input, writing output or the record store fails.
pub async fn run<S, R, W>(controller: &mut Controller<S>, input: R, mut output: W) -> Result<()>
where
    S: RecordStore,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    write_screen(controller, &mut output).await?;

    loop {
        let deadline = controller.status().deadline();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let now = Instant::now();
                controller.tick(now);

                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Nothing) => {}
                    Ok(Command::Help) => output.write_all(HELP.as_bytes()).await?,
                    Ok(Command::Show) => write_screen(controller, &mut output).await?,
                    Ok(command) => {
                        let event = into_event(controller, command);
                        controller.handle(event, now)?;
                        if let Some(action) = controller.pending() {
                            let prompt = format!("{} (yes/no)\n", confirmation_prompt(action));
                            output.write_all(prompt.as_bytes()).await?;
                        } else {
                            write_screen(controller, &mut output).await?;
                        }
                    }
                    Err(message) => {
                        output.write_all(format!("{message}\n").as_bytes()).await?;
                    }
                }
                output.flush().await?;
            }
            () = wait_until(deadline) => {
                controller.tick(Instant::now());
            }
        }
    }

    output.flush().await?;
    Ok(())
}

/// Map a parsed command onto the event it stands for on the active screen.
fn into_event<S: RecordStore>(controller: &Controller<S>, command: Command) -> Event {
    let screen = controller.navigation().active();
    match command {
        Command::Event(event) => event,
        Command::Delete(id) => Event::RequestAction(match screen {
            Screen::Participants => RowAction::DeleteParticipant(id),
            Screen::Leaderboard => RowAction::DeleteResult(id),
        }),
        Command::Filter(query) => Event::Filter(table_for(screen), query),
        // Handled before dispatch
        Command::Show | Command::Help | Command::Quit | Command::Nothing => Event::Cancel,
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => future::pending().await,
    }
}

async fn write_screen<S, W>(controller: &Controller<S>, output: &mut W) -> Result<()>
where
    S: RecordStore,
    W: AsyncWrite + Unpin,
{
    let mut text = String::new();

    let tabs: Vec<String> = controller
        .navigation()
        .tabs()
        .iter()
        .map(|tab| {
            if tab.active {
                format!("[{}]", tab.screen)
            } else {
                format!(" {} ", tab.screen)
            }
        })
        .collect();
    text.push_str(&tabs.join(" "));
    text.push('\n');

    if let Some(message) = controller.status().visible() {
        let tag = match message.severity {
            crate::controller::Severity::Success => "ok",
            crate::controller::Severity::Error => "error",
        };
        text.push_str(&format!("({tag}) {}\n", message.text));
    }

    let table = controller.active_table();
    let query = controller.filter_query(table.kind);
    if !query.is_empty() {
        text.push_str(&format!("filter: {query}\n"));
    }
    text.push_str(&table.to_string());

    let links: Vec<String> = controller
        .navigation()
        .links()
        .iter()
        .map(|link| {
            if link.active {
                format!("{} (current)", link.screen)
            } else {
                link.screen.to_string()
            }
        })
        .collect();
    text.push_str(&format!("nav: {}\n", links.join(" | ")));

    output.write_all(text.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DEFAULT_STATUS_TIMEOUT;
    use crate::storage::{MemoryStore, Records};
    use crate::store::Scoreboard;

    fn controller() -> Controller<MemoryStore> {
        let board = Scoreboard::load(Records::new(MemoryStore::new())).unwrap();
        Controller::new(board, Screen::Participants, DEFAULT_STATUS_TIMEOUT)
    }

    async fn run_script(c: &mut Controller<MemoryStore>, script: &str) -> String {
        let mut output = Vec::new();
        run(c, script.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_tab_and_nav() {
        assert_eq!(
            parse_command("tab leaderboard"),
            Ok(Command::Event(Event::SelectTab(Screen::Leaderboard)))
        );
        assert_eq!(
            parse_command("NAV participants"),
            Ok(Command::Event(Event::SelectLink(Some(Screen::Participants))))
        );
        assert!(parse_command("tab scores").is_err());
    }

    #[test]
    fn test_parse_set_keeps_value_spacing() {
        assert_eq!(
            parse_command("set members a, b ,c"),
            Ok(Command::Event(Event::EditForm(
                FormField::Members,
                "a, b ,c".to_string()
            )))
        );
        assert_eq!(
            parse_command("set team"),
            Ok(Command::Event(Event::EditForm(FormField::TeamName, String::new())))
        );
        assert!(parse_command("set nickname x").is_err());
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(
            parse_command("score 17 uptime 99.5 %"),
            Ok(Command::Event(Event::EditScore {
                result_id: "17".to_string(),
                field: ScoreField::Uptime,
                value: "99.5 %".to_string(),
            }))
        );
        assert!(parse_command("score 17").is_err());
        assert!(parse_command("score 17 flags 3").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command("  "), Ok(Command::Nothing));
        assert_eq!(parse_command("y"), Ok(Command::Event(Event::Confirm)));
        assert_eq!(parse_command("no"), Ok(Command::Event(Event::Cancel)));
        assert_eq!(parse_command("filter"), Ok(Command::Filter(String::new())));
        assert_eq!(parse_command("delete 5"), Ok(Command::Delete("5".to_string())));
        assert!(parse_command("delete").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[tokio::test]
    async fn test_session_registers_team() {
        let mut c = controller();
        let out = run_script(
            &mut c,
            "set team Alpha\nset email alpha@example.org\nset members a, b\nsubmit\nquit\n",
        )
        .await;

        assert_eq!(c.board().participants().len(), 1);
        assert!(out.contains("(ok) Team \"Alpha\" registered successfully!"));
        assert!(out.contains("alpha@example.org"));
    }

    #[tokio::test]
    async fn test_session_delete_asks_first() {
        let mut c = controller();
        run_script(&mut c, "set team Alpha\nsubmit\n").await;
        let id = c.board().participants()[0].id.clone();

        let out = run_script(&mut c, &format!("delete {id}\nno\n")).await;
        assert!(out.contains("Are you sure you want to delete this participant? (yes/no)"));
        assert_eq!(c.board().participants().len(), 1);

        run_script(&mut c, &format!("delete {id}\nyes\n")).await;
        assert!(c.board().participants().is_empty());
    }

    #[tokio::test]
    async fn test_session_delete_on_leaderboard_targets_result() {
        let mut c = controller();
        run_script(&mut c, "set team Alpha\nsubmit\n").await;
        let id = c.board().participants()[0].id.clone();

        let out = run_script(&mut c, &format!("tab leaderboard\ndelete {id}\nyes\n")).await;
        assert!(out.contains("delete this result?"));
        assert!(c.board().results().is_empty());
        assert_eq!(c.board().participants().len(), 1);
    }

    #[tokio::test]
    async fn test_session_score_and_filter() {
        let mut c = controller();
        run_script(&mut c, "set team Alpha\nsubmit\nset team Beta\nsubmit\n").await;
        let beta = c.board().participants()[1].id.clone();

        let out = run_script(
            &mut c,
            &format!("tab leaderboard\nscore {beta} defence 12\nfilter beta\n"),
        )
        .await;

        assert!(out.contains("[leaderboard]"));
        assert!(out.contains("Score updated successfully!"));
        assert!(out.contains("filter: beta"));
        assert_eq!(c.board().find_result(&beta).unwrap().total_score, 12);
        assert_eq!(c.active_table().visible_rows().count(), 1);
    }

    #[tokio::test]
    async fn test_session_marks_active_tab_and_link() {
        let mut c = controller();
        let out = run_script(&mut c, "nav leaderboard\n").await;
        let last_screen = out.rsplit_once("[leaderboard]").unwrap().1;

        assert!(out.contains("[participants]  leaderboard "));
        assert!(out.contains("nav: participants (current) | leaderboard\n"));
        assert!(last_screen.contains("nav: participants | leaderboard (current)\n"));
        assert!(last_screen.contains("No results available yet."));
    }

    #[tokio::test]
    async fn test_session_reports_bad_input() {
        let mut c = controller();
        let out = run_script(&mut c, "jump\nhelp\n").await;

        assert!(out.contains("unknown command 'jump'"));
        assert!(out.contains("Commands:"));
    }

    #[tokio::test]
    async fn test_session_ends_at_eof() {
        let mut c = controller();
        let out = run_script(&mut c, "").await;
        assert!(out.contains("No participants registered yet."));
    }
}
