use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use tracing::debug;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;

/// Setting this variable switches the shell to line-by-line stdin mode with
/// no prompts, no colour and a non-zero exit on storage failures.
pub const SCRIPT_ENV: &str = "EXPENSE_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = match std::env::var_os(SCRIPT_ENV) {
        Some(_) => CliMode::Script,
        None => CliMode::Interactive,
    };
    let mut context = ShellContext::new(mode)?;
    let outcome = match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    };
    debug!(?mode, last = ?context.last_command, "shell finished");
    outcome
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output_info("Personal expense ledger. Type `help` for commands or `menu` for a guided menu.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.trim()).ok();
                }
                if !feed(context, &line)? {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) if context.confirm_exit()? => break,
            Err(ReadlineError::Interrupted) => {}
            Err(ReadlineError::Eof) => {
                output_info("Goodbye.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if !context.running || !feed(context, &line?)? {
            break;
        }
    }
    Ok(())
}

/// Runs one input line and reports its failure. Returns `false` once the
/// shell should stop reading.
fn feed(context: &mut ShellContext, line: &str) -> Result<bool, CliError> {
    match handle_line(context, line) {
        Ok(LoopControl::Exit) => Ok(false),
        Ok(LoopControl::Continue) => Ok(true),
        Err(err) => context.report_error(err).map(|()| true),
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(LoopControl::Continue);
    }
    let tokens = parse_command_line(line)?;
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    context.last_command = Some(line.to_string());
    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Shell-style word splitting, so quoted descriptions stay one argument.
pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, CommandError> {
    shell_words::split(input)
        .map_err(|err| CommandError::InvalidArguments(format!("Could not read `{input}`: {err}")))
}

/// Completes the first word of a line against the command names.
struct CommandHelper {
    commands: Vec<&'static str>,
}

impl CommandHelper {
    fn new(mut commands: Vec<&'static str>) -> Self {
        commands.sort_unstable();
        commands.dedup();
        Self { commands }
    }

    fn candidates(&self, prefix: &str) -> (usize, Vec<&'static str>) {
        let start = prefix.rfind(char::is_whitespace).map_or(0, |idx| idx + 1);
        if !prefix[..start].trim().is_empty() {
            return (start, Vec::new());
        }
        let needle = prefix[start..].to_ascii_lowercase();
        let matches = self
            .commands
            .iter()
            .copied()
            .filter(|name| name.starts_with(&needle))
            .collect();
        (start, matches)
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, names) = self.candidates(&line[..pos]);
        let pairs = names
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

impl Helper for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::test_support::context;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"add 2024-01-05 food 12.50 "team lunch""#).unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[4], "team lunch");
        assert!(matches!(
            parse_command_line("add \"unterminated"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let (mut context, _guard) = context();
        assert_eq!(
            handle_line(&mut context, "   # setup").unwrap(),
            LoopControl::Continue
        );
        assert_eq!(handle_line(&mut context, "").unwrap(), LoopControl::Continue);
        assert!(context.last_command.is_none());
    }

    #[test]
    fn exit_stops_the_context() {
        let (mut context, _guard) = context();
        assert_eq!(handle_line(&mut context, "exit").unwrap(), LoopControl::Exit);
        assert!(!context.running);
        assert_eq!(context.last_command.as_deref(), Some("exit"));
    }

    #[test]
    fn unreadable_lines_keep_the_shell_running() {
        let (mut context, _guard) = context();
        assert!(feed(&mut context, "add \"unterminated").unwrap());
        assert!(!feed(&mut context, "quit").unwrap());
    }

    #[test]
    fn completion_only_offers_command_names() {
        let helper = CommandHelper::new(vec!["summary", "add", "config", "add"]);
        assert_eq!(helper.candidates("su"), (0, vec!["summary"]));
        assert_eq!(helper.candidates("  a").1, vec!["add"]);
        assert!(helper.candidates("summary we").1.is_empty());
    }
}
