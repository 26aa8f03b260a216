use std::borrow::Cow::{self, Borrowed};

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::HistoryHinter;
use rustyline::{Context, Helper, Hinter, Validator};

use crate::parser::KEYWORDS;

/// Line editor helper: completes command keywords and hints from history. Only the prompt is coloured.
#[derive(Helper, Hinter, Validator)]
pub(crate) struct FinsageHelper {
    #[rustyline(Hinter)]
    pub(crate) hinter: HistoryHinter,
    pub(crate) colored_prompt: String,
}

impl Completer for FinsageHelper {
    type Candidate = Pair;

    /// Only the first word is completed
    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = line.get(..pos).unwrap_or(line);
        if prefix.contains(char::is_whitespace) {
            return Ok((pos, vec![]));
        }

        let upper = prefix.to_ascii_uppercase();
        let candidates = KEYWORDS.iter()
            .filter(|keyword| keyword.starts_with(upper.as_str()))
            .map(|keyword| Pair { display: keyword.to_string(), replacement: format!("{keyword} ") })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for FinsageHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Borrowed(&self.colored_prompt)
        } else {
            Borrowed(prompt)
        }
    }
}
