//! Session script language
//!
//! One action per line: a command word followed by its arguments.
//! Blank lines and `#` comments are skipped. Free text (split names,
//! member names) takes the rest of the line.

use chrono::NaiveDate;

use crate::domain::{MemberId, SplitId};

/// A single user action in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Open the create form
    New,
    /// Close the create form, discarding the draft
    Close,
    Name(String),
    Date(NaiveDate),
    /// Creator share, raw input
    Creator(String),
    Add,
    Remove(MemberId),
    Email(MemberId, String),
    MemberName(MemberId, String),
    Pct(MemberId, String),
    Total,
    Submit,
    List,
    Show(SplitId),
    Toggle(SplitId),
    Edit(SplitId),
    EditCreator(String),
    EditPct(MemberId, String),
    Save,
    Cancel,
    Stats,
    /// Payout preview for an amount in cents
    Payout(SplitId, u64),
}

/// Parse one script line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match word {
        "new" => {
            no_args(word, &args)?;
            SessionCommand::New
        }
        "close" => {
            no_args(word, &args)?;
            SessionCommand::Close
        }
        "name" => SessionCommand::Name(rest.to_string()),
        "date" => {
            let [raw] = exact::<1>(word, &args, "<YYYY-MM-DD>")?;
            SessionCommand::Date(parse_date(raw)?)
        }
        "creator" => SessionCommand::Creator(rest.to_string()),
        "add" => {
            no_args(word, &args)?;
            SessionCommand::Add
        }
        "remove" => {
            let [id] = exact::<1>(word, &args, "<member>")?;
            SessionCommand::Remove(MemberId::from(id))
        }
        "email" => {
            let [id, email] = exact::<2>(word, &args, "<member> <email>")?;
            SessionCommand::Email(MemberId::from(id), email.to_string())
        }
        "member-name" => {
            let (id, name) = head_and_rest(word, rest, "<member> <name>")?;
            SessionCommand::MemberName(MemberId::from(id), name.to_string())
        }
        "pct" => {
            let (id, raw) = head_and_rest(word, rest, "<member> <percentage>")?;
            SessionCommand::Pct(MemberId::from(id), raw.to_string())
        }
        "total" => {
            no_args(word, &args)?;
            SessionCommand::Total
        }
        "submit" => {
            no_args(word, &args)?;
            SessionCommand::Submit
        }
        "list" => {
            no_args(word, &args)?;
            SessionCommand::List
        }
        "show" => {
            let [id] = exact::<1>(word, &args, "<split>")?;
            SessionCommand::Show(SplitId::from(id))
        }
        "toggle" => {
            let [id] = exact::<1>(word, &args, "<split>")?;
            SessionCommand::Toggle(SplitId::from(id))
        }
        "edit" => {
            let [id] = exact::<1>(word, &args, "<split>")?;
            SessionCommand::Edit(SplitId::from(id))
        }
        "edit-creator" => SessionCommand::EditCreator(rest.to_string()),
        "edit-pct" => {
            let (id, raw) = head_and_rest(word, rest, "<member> <percentage>")?;
            SessionCommand::EditPct(MemberId::from(id), raw.to_string())
        }
        "save" => {
            no_args(word, &args)?;
            SessionCommand::Save
        }
        "cancel" => {
            no_args(word, &args)?;
            SessionCommand::Cancel
        }
        "stats" => {
            no_args(word, &args)?;
            SessionCommand::Stats
        }
        "payout" => {
            let [id, amount] = exact::<2>(word, &args, "<split> <amount>")?;
            let cents = parse_amount_cents(amount)
                .ok_or_else(|| format!("invalid amount: {amount}"))?;
            SessionCommand::Payout(SplitId::from(id), cents)
        }
        other => return Err(format!("unknown command: {other}")),
    };

    Ok(Some(command))
}

fn no_args(word: &str, args: &[&str]) -> Result<(), String> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(format!("'{word}' takes no arguments"))
    }
}

fn exact<'a, const N: usize>(
    word: &str,
    args: &[&'a str],
    usage: &str,
) -> Result<[&'a str; N], String> {
    <[&str; N]>::try_from(args).map_err(|_| format!("usage: {word} {usage}"))
}

fn head_and_rest<'a>(word: &str, rest: &'a str, usage: &str) -> Result<(&'a str, &'a str), String> {
    match rest.split_once(char::is_whitespace) {
        Some((head, tail)) => Ok((head, tail.trim())),
        None if !rest.is_empty() => Ok((rest, "")),
        None => Err(format!("usage: {word} {usage}")),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("invalid date '{raw}': {e}"))
}

/// Parse a decimal amount such as `18471`, `18,471.5` or `0.05` into cents.
pub fn parse_amount_cents(raw: &str) -> Option<u64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.strip_prefix('$').unwrap_or(&cleaned);
    let (whole, frac) = match cleaned.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (cleaned, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
        || frac.len() > 2
    {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac: u64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<u64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_blank_or_comment_when_parsing_then_none() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# create a split"), Ok(None));
    }

    #[test]
    fn given_name_with_spaces_when_parsing_then_keeps_rest_of_line() {
        assert_eq!(
            parse_line("name   Ad Revenue  "),
            Ok(Some(SessionCommand::Name("Ad Revenue".into())))
        );
    }

    #[test]
    fn given_member_commands_when_parsing_then_ids_and_raw_values_kept() {
        assert_eq!(
            parse_line("pct m1 40%"),
            Ok(Some(SessionCommand::Pct(MemberId::from("m1"), "40%".into())))
        );
        assert_eq!(
            parse_line("email m2 bob@example.com"),
            Ok(Some(SessionCommand::Email(
                MemberId::from("m2"),
                "bob@example.com".into()
            )))
        );
        assert_eq!(
            parse_line("member-name m2 Bob Smith"),
            Ok(Some(SessionCommand::MemberName(
                MemberId::from("m2"),
                "Bob Smith".into()
            )))
        );
        assert_eq!(
            parse_line("edit-pct m1"),
            Ok(Some(SessionCommand::EditPct(MemberId::from("m1"), String::new())))
        );
    }

    #[test]
    fn given_date_when_parsing_then_iso_required() {
        assert_eq!(
            parse_line("date 2026-10-01"),
            Ok(Some(SessionCommand::Date(
                NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
            )))
        );
        assert!(parse_line("date 10/01/2026").is_err());
        assert!(parse_line("date").is_err());
    }

    #[test]
    fn given_bad_arity_when_parsing_then_usage_error() {
        assert_eq!(parse_line("toggle"), Err("usage: toggle <split>".into()));
        assert_eq!(parse_line("submit now"), Err("'submit' takes no arguments".into()));
        assert_eq!(parse_line("pct"), Err("usage: pct <member> <percentage>".into()));
    }

    #[test]
    fn given_unknown_command_when_parsing_then_error() {
        assert_eq!(parse_line("delete s1"), Err("unknown command: delete".into()));
    }

    #[rstest]
    #[case("18471", Some(1_847_100))]
    #[case("18,471.00", Some(1_847_100))]
    #[case("$0.05", Some(5))]
    #[case("12.5", Some(1250))]
    #[case(".5", Some(50))]
    #[case("1.234", None)]
    #[case("-3", None)]
    #[case("abc", None)]
    #[case(".", None)]
    fn given_amount_when_parsing_then_cents(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_amount_cents(raw), expected);
    }
}
