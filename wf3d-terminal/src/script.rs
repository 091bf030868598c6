/// Line-oriented script reader
///
/// A command keyword sits alone on a line; commands that take arguments
/// read them from the following line. Blank lines and lines starting with
/// `#` are ignored.
use std::path::PathBuf;

use nom::{combinator::all_consuming, number::complete::double};
use wf3d_core::Axis;

/// One parsed script command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Line([f64; 6]),
    Circle([f64; 4]),
    Hermite([f64; 8]),
    Bezier([f64; 8]),
    Box([f64; 6]),
    Sphere([f64; 4]),
    Torus([f64; 5]),
    Scale([f64; 3]),
    Move([f64; 3]),
    Rotate(Axis, f64),
    Ident,
    Apply,
    Clear,
    Display,
    Save(PathBuf),
    Quit,
}

/// A command and the 1-based line its keyword was on
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub line: usize,
    pub command: Command,
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{name}'")]
    UnknownCommand { line: usize, name: String },

    #[error("line {line}: {command} expects {expected} arguments, got {got}")]
    ArgCount {
        line: usize,
        command: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: {command} has no argument line")]
    MissingArguments { line: usize, command: &'static str },

    #[error("line {line}: {command}: '{token}' is not a number")]
    InvalidNumber {
        line: usize,
        command: &'static str,
        token: String,
    },

    #[error("line {line}: {source}")]
    Engine {
        line: usize,
        #[source]
        source: wf3d_core::Error,
    },
}

/// Keywords and whether they read an argument line
const KEYWORDS: &[(&str, bool)] = &[
    ("line", true),
    ("circle", true),
    ("hermite", true),
    ("bezier", true),
    ("box", true),
    ("sphere", true),
    ("torus", true),
    ("scale", true),
    ("move", true),
    ("rotate", true),
    ("save", true),
    ("ident", false),
    ("apply", false),
    ("clear", false),
    ("display", false),
    ("quit", false),
];

fn lookup(keyword: &str) -> Option<(&'static str, bool)> {
    KEYWORDS.iter().copied().find(|(name, _)| *name == keyword)
}

/// One finite number; `nan` and `inf` are refused like any other bad token
fn number(line: usize, command: &'static str, token: &str) -> Result<f64, ScriptError> {
    all_consuming(double::<&str, nom::error::Error<&str>>)(token)
        .ok()
        .map(|(_, v)| v)
        .filter(|v| v.is_finite())
        .ok_or_else(|| ScriptError::InvalidNumber {
            line,
            command,
            token: token.to_string(),
        })
}

/// Parse exactly `N` numbers from an argument line
fn numbers<const N: usize>(
    line: usize,
    command: &'static str,
    tokens: &[&str],
) -> Result<[f64; N], ScriptError> {
    if tokens.len() != N {
        return Err(ScriptError::ArgCount {
            line,
            command,
            expected: N,
            got: tokens.len(),
        });
    }
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = number(line, command, token)?;
    }
    Ok(out)
}

fn build(line: usize, command: &'static str, tokens: &[&str]) -> Result<Command, ScriptError> {
    let parsed = match command {
        "line" => Command::Line(numbers(line, command, tokens)?),
        "circle" => Command::Circle(numbers(line, command, tokens)?),
        "hermite" => Command::Hermite(numbers(line, command, tokens)?),
        "bezier" => Command::Bezier(numbers(line, command, tokens)?),
        "box" => Command::Box(numbers(line, command, tokens)?),
        "sphere" => Command::Sphere(numbers(line, command, tokens)?),
        "torus" => Command::Torus(numbers(line, command, tokens)?),
        "scale" => Command::Scale(numbers(line, command, tokens)?),
        "move" => Command::Move(numbers(line, command, tokens)?),
        "rotate" => match tokens {
            [axis, degrees] => {
                let axis = axis
                    .parse::<Axis>()
                    .map_err(|source| ScriptError::Engine { line, source })?;
                Command::Rotate(axis, number(line, command, degrees)?)
            }
            _ => {
                return Err(ScriptError::ArgCount {
                    line,
                    command,
                    expected: 2,
                    got: tokens.len(),
                })
            }
        },
        "save" => match tokens {
            [path] => Command::Save(PathBuf::from(path)),
            _ => {
                return Err(ScriptError::ArgCount {
                    line,
                    command,
                    expected: 1,
                    got: tokens.len(),
                })
            }
        },
        "ident" => Command::Ident,
        "apply" => Command::Apply,
        "clear" => Command::Clear,
        "display" => Command::Display,
        "quit" => Command::Quit,
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                name: other.to_string(),
            })
        }
    };
    Ok(parsed)
}

/// Parse a whole script.
///
/// Each entry is one command or the error that made it unusable, in
/// source order, so callers can report and skip bad commands.
pub fn parse(source: &str) -> Vec<Result<Statement, ScriptError>> {
    let mut out = Vec::new();
    let mut lines = source.lines().enumerate().map(|(i, text)| (i + 1, text.trim()));

    while let Some((line, keyword)) = lines.next() {
        if keyword.is_empty() || keyword.starts_with('#') {
            continue;
        }
        let Some((command, takes_args)) = lookup(keyword) else {
            out.push(Err(ScriptError::UnknownCommand {
                line,
                name: keyword.to_string(),
            }));
            continue;
        };

        let tokens: Vec<&str> = if takes_args {
            match lines.next() {
                Some((_, text)) => text.split_whitespace().collect(),
                None => {
                    out.push(Err(ScriptError::MissingArguments { line, command }));
                    continue;
                }
            }
        } else {
            Vec::new()
        };

        out.push(build(line, command, &tokens).map(|command| Statement { line, command }));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(source: &str) -> Vec<Command> {
        parse(source)
            .into_iter()
            .map(|s| s.unwrap().command)
            .collect()
    }

    #[test]
    fn test_parses_every_command() {
        let source = "\
# gallery
line
0 0 0 100 100 0
circle
250 250 0 50
hermite
0 0 1 1 2 2 3 3
bezier
0 0 1 1 2 2 3 3
box
0 100 0 50 50 50
sphere
250 250 0 100
torus
250 250 0 20 100
scale
2 2 2
move
10 -5 0.5
rotate
y 45

ident
apply
clear
display
save
out.ppm
quit
";
        let parsed = commands(source);
        assert_eq!(parsed.len(), 16);
        assert_eq!(parsed[0], Command::Line([0.0, 0.0, 0.0, 100.0, 100.0, 0.0]));
        assert_eq!(parsed[6], Command::Torus([250.0, 250.0, 0.0, 20.0, 100.0]));
        assert_eq!(parsed[8], Command::Move([10.0, -5.0, 0.5]));
        assert_eq!(parsed[9], Command::Rotate(Axis::Y, 45.0));
        assert_eq!(parsed[14], Command::Save(PathBuf::from("out.ppm")));
        assert_eq!(parsed[15], Command::Quit);
    }

    #[test]
    fn test_statements_keep_keyword_line() {
        let parsed = parse("\n# note\nscale\n1 1 1\napply\n");
        let lines: Vec<usize> = parsed.iter().map(|s| s.as_ref().unwrap().line).collect();
        assert_eq!(lines, vec![3, 5]);
    }

    #[test]
    fn test_wrong_argument_count_is_reported_and_consumed() {
        let parsed = parse("line\n1 2 3\napply\n");
        assert_eq!(parsed.len(), 2);
        assert!(matches!(
            parsed[0],
            Err(ScriptError::ArgCount {
                line: 1,
                command: "line",
                expected: 6,
                got: 3
            })
        ));
        assert_eq!(parsed[1].as_ref().unwrap().command, Command::Apply);
    }

    #[test]
    fn test_bad_tokens() {
        let parsed = parse("move\n1 two 3\nrotate\nw 90\nrotate\nx\nfrobnicate\nsave\n");
        assert!(matches!(
            &parsed[0],
            Err(ScriptError::InvalidNumber { token, .. }) if token == "two"
        ));
        assert!(matches!(
            parsed[1],
            Err(ScriptError::Engine {
                source: wf3d_core::Error::UnknownAxis(_),
                ..
            })
        ));
        assert!(matches!(parsed[2], Err(ScriptError::ArgCount { expected: 2, .. })));
        assert!(matches!(
            &parsed[3],
            Err(ScriptError::UnknownCommand { name, .. }) if name == "frobnicate"
        ));
        assert!(matches!(parsed[4], Err(ScriptError::MissingArguments { command: "save", .. })));
    }

    #[test]
    fn test_non_finite_numbers_are_refused() {
        let source = "scale\nnan 1 1\nline\n0 0 0 inf 1 1\nrotate\nz -infinity\nmove\n1e3 -2.5 0\n";
        let parsed = parse(source);
        for (entry, token) in parsed.iter().zip(["nan", "inf", "-infinity"]) {
            assert!(matches!(
                entry,
                Err(ScriptError::InvalidNumber { token: t, .. }) if t == token
            ));
        }
        assert_eq!(parsed[3].as_ref().unwrap().command, Command::Move([1000.0, -2.5, 0.0]));
    }

    #[test]
    fn test_keywords_are_trimmed() {
        assert_eq!(commands("  display  \n"), vec![Command::Display]);
    }
}
