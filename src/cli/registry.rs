//! Name and alias lookup for shell commands.

use std::collections::HashMap;
use std::iter;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            description,
            usage,
            handler,
        }
    }

    pub fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    /// The primary name followed by every alias.
    pub fn spellings(&self) -> impl Iterator<Item = &'static str> + '_ {
        iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// Entries in listing order. A spelling already taken by an earlier entry
/// keeps pointing there.
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn from_entries(entries: Vec<CommandEntry>) -> Self {
        let mut lookup = HashMap::new();
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            if lookup.contains_key(entry.name) {
                continue;
            }
            for spelling in entry.spellings() {
                lookup.entry(spelling).or_insert(kept.len());
            }
            kept.push(entry);
        }
        Self {
            entries: kept,
            lookup,
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.lookup.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Every accepted spelling, for completion and suggestions.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().flat_map(CommandEntry::spellings)
    }
}
