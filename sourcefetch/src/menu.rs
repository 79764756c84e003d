//! Numbered console menus.
//!
//! [`Prompter`] owns the console streams. It is generic over the reader and
//! writer so the whole dialogue can be scripted in tests.

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use anyhow::Context;

use crate::catalog::{BoardCatalog, Selection, VendorEntry};

/// How a line of menu input was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based index of the picked option.
    Valid(usize),
    /// Not a decimal number.
    NotANumber,
    /// A number outside `1..=len`.
    OutOfRange,
}

/// Judges one line of input against a menu of `len` options.
pub fn parse_choice(input: &str, len: usize) -> Choice {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Choice::NotANumber;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Choice::Valid(n - 1),
        // digits only, so a parse error means overflow
        _ => Choice::OutOfRange,
    }
}

/// Console dialogue over any line reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// A prompter on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter reading lines from `input` and writing to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Gives the streams back.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("failed to read console input")?;
        if n == 0 {
            bail!("console input closed while waiting for: {}", prompt.trim());
        }
        Ok(line.trim().to_string())
    }

    fn print_menu<T: AsRef<str>>(&mut self, title: &str, items: &[T]) -> io::Result<()> {
        writeln!(self.output, "\n-----{title}-----\n")?;
        for (idx, item) in items.iter().enumerate() {
            writeln!(self.output, "{}) {}", idx + 1, item.as_ref())?;
        }
        Ok(())
    }

    /// Asks until the user enters a number in `1..=options.len()` and returns
    /// that option.
    ///
    /// Non-numeric input and out-of-range numbers each cost one re-prompt
    /// with a message telling the two apart.
    ///
    /// # Errors
    ///
    /// Fails if `options` is empty or the input stream ends.
    pub fn select_from_list<'a, T>(
        &mut self,
        options: &'a [T],
        prompt: &str,
    ) -> anyhow::Result<&'a T> {
        if options.is_empty() {
            bail!("nothing to choose from for: {prompt}");
        }

        let mut question = format!("\n{prompt} (by number): ");
        loop {
            let answer = self.ask(&question)?;
            match parse_choice(&answer, options.len()) {
                Choice::Valid(idx) => return Ok(&options[idx]),
                Choice::NotANumber => {
                    debug!("rejected non-numeric menu input {answer:?}");
                    question = format!("\n{prompt} (please enter a number): ");
                }
                Choice::OutOfRange => {
                    debug!("rejected out-of-range menu input {answer:?}");
                    question = format!("\n{prompt} (please enter a valid number): ");
                }
            }
        }
    }

    /// Walks the vendor menu, then that vendor's board menu, and echoes the
    /// result.
    pub fn select_board(&mut self, catalog: &BoardCatalog) -> anyhow::Result<Selection> {
        let entries = catalog.entries();
        let vendors: Vec<&str> = entries.iter().map(|e| e.vendor.as_str()).collect();
        self.print_menu("CHOOSE A VENDOR", &vendors)?;
        let entry = self.select_from_list(entries, "Select your vendor")?;
        self.select_vendor_board(entry)
    }

    /// Shows the board menu of an already chosen vendor and echoes the
    /// result.
    pub fn select_vendor_board(&mut self, entry: &VendorEntry) -> anyhow::Result<Selection> {
        self.print_menu("CHOOSE A BOARD", &entry.boards)?;
        let board = self.select_from_list(&entry.boards, "Select your board")?;

        let selection = Selection {
            vendor: entry.vendor.clone(),
            board: board.clone(),
        };
        writeln!(self.output, "\n-----YOUR BOARD CHOICE-----\n")?;
        writeln!(self.output, "Your choice was the {selection}")?;
        Ok(selection)
    }

    /// Asks for the name of the directory the sources are cloned into.
    /// Blank answers are asked again.
    pub fn prompt_output_directory(&mut self) -> anyhow::Result<String> {
        writeln!(self.output, "\n-----Choosing output folder name-----\n")?;
        loop {
            let answer = self.ask("What would you like the output folder to be called: ")?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_inner().1).unwrap()
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1", 3), Choice::Valid(0));
        assert_eq!(parse_choice(" 3\r", 3), Choice::Valid(2));
        assert_eq!(parse_choice("0", 3), Choice::OutOfRange);
        assert_eq!(parse_choice("4", 3), Choice::OutOfRange);
        assert_eq!(parse_choice("99999999999999999999999", 3), Choice::OutOfRange);
        assert_eq!(parse_choice("e", 3), Choice::NotANumber);
        assert_eq!(parse_choice("-1", 3), Choice::NotANumber);
        assert_eq!(parse_choice("+1", 3), Choice::NotANumber);
        assert_eq!(parse_choice("1.0", 3), Choice::NotANumber);
        assert_eq!(parse_choice("", 3), Choice::NotANumber);
    }

    #[test]
    fn test_reprompts_until_valid() {
        let options = ["Option 1", "Option 2", "Option 3"];
        let mut p = prompter("0\n99\ne\n2\n");

        let picked = p.select_from_list(&options, "Choose an option").unwrap();
        assert_eq!(*picked, "Option 2");

        let out = output(p);
        assert_eq!(out.matches("Choose an option (by number): ").count(), 1);
        assert_eq!(
            out.matches("Choose an option (please enter a valid number): ")
                .count(),
            2
        );
        assert_eq!(
            out.matches("Choose an option (please enter a number): ").count(),
            1
        );
    }

    #[test]
    fn test_first_answer_accepted() {
        let options = ["a", "b"];
        let mut p = prompter("2\n");
        assert_eq!(*p.select_from_list(&options, "Pick").unwrap(), "b");
        assert!(!output(p).contains("please"));
    }

    #[test]
    fn test_closed_input_is_error() {
        let options = ["a", "b"];
        let mut p = prompter("x\n7\n");
        assert!(p.select_from_list(&options, "Pick").is_err());

        let empty: [&str; 0] = [];
        let mut p = prompter("1\n");
        assert!(p.select_from_list(&empty, "Pick").is_err());
    }

    #[test]
    fn test_select_board_default_catalog() {
        let catalog = BoardCatalog::default();
        let mut p = prompter("0\n15\ne\n2\n0\n5\ne\n1\n");

        let sel = p.select_board(&catalog).unwrap();
        assert_eq!(sel.vendor, "espressif");
        assert_eq!(sel.board, "esp32");

        let out = output(p);
        assert!(out.contains("-----CHOOSE A VENDOR-----"));
        assert!(out.contains("1) cypress\n2) espressif\n"));
        assert!(out.contains("14) xilinx\n"));
        assert!(out.contains("-----CHOOSE A BOARD-----\n\n1) esp32\n"));
        assert!(out.ends_with("Your choice was the espressif esp32\n"));
    }

    #[test]
    fn test_select_board_single_vendor() {
        let catalog = BoardCatalog::new(vec![VendorEntry {
            vendor: "espressif".into(),
            boards: vec!["esp32".into()],
        }])
        .unwrap();
        let mut p = prompter("1\n1\n");

        let sel = p.select_board(&catalog).unwrap();
        assert_eq!(sel.record(), "espressif,esp32");
        assert!(output(p).contains("Your choice was the espressif esp32"));
    }

    #[test]
    fn test_vendor_board_menu_is_shown() {
        let catalog = BoardCatalog::default();
        let pc = catalog
            .entries()
            .iter()
            .find(|e| e.vendor == "pc")
            .unwrap();
        let mut p = prompter("2\n");

        let sel = p.select_vendor_board(pc).unwrap();
        assert_eq!(sel.to_string(), "pc windows");

        let out = output(p);
        assert!(out.contains("-----CHOOSE A BOARD-----\n\n1) linux\n2) windows\n"));
        assert!(!out.contains("CHOOSE A VENDOR"));
        assert!(out.ends_with("Your choice was the pc windows\n"));
    }

    #[test]
    fn test_output_directory_prompt() {
        let mut p = prompter("\n   \nmyBuild\n");
        assert_eq!(p.prompt_output_directory().unwrap(), "myBuild");
        let out = output(p);
        assert_eq!(
            out.matches("What would you like the output folder to be called: ")
                .count(),
            3
        );
    }
}
