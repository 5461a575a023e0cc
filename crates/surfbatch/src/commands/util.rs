//! Shared helpers for command handlers.

use std::io::{IsTerminal, Read};
use std::path::Path;

use surfbatch_core::{Imei, parse_imei_list};

use crate::cli::BatchInput;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, refuses instead of guessing.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Collect IMEIs from positional args and `--file`, in that order.
///
/// Every source goes through the same splitting rule as pasted text.
pub fn read_identifiers(input: &BatchInput) -> Result<Vec<Imei>, CliError> {
    let mut imeis = parse_imei_list(&input.imeis.join(" "))?;

    if let Some(ref path) = input.file {
        let text = read_source(path)?;
        imeis.extend(parse_imei_list(&text)?);
    }

    if imeis.is_empty() {
        return Err(CliError::NoInput);
    }
    Ok(imeis)
}

fn read_source(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn args_then_file_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "333\n444, 111").unwrap();

        let input = BatchInput {
            imeis: vec!["111,222".into()],
            file: Some(file.path().to_path_buf()),
        };
        let raw: Vec<String> = read_identifiers(&input)
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(raw, ["111", "222", "333", "444", "111"]);
    }

    #[test]
    fn empty_input_is_an_error() {
        let input = BatchInput {
            imeis: vec![" , ".into()],
            file: None,
        };
        assert!(matches!(read_identifiers(&input), Err(CliError::NoInput)));
    }

    #[test]
    fn bad_identifier_is_a_validation_error() {
        let input = BatchInput {
            imeis: vec!["12ab".into()],
            file: None,
        };
        assert!(matches!(
            read_identifiers(&input),
            Err(CliError::Validation { .. })
        ));
    }
}
