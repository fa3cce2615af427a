//! Program representation: raw script text in, flat instruction list out.
//!
//! One instruction per line, `OPCODE [arg ...]`, whitespace-tokenized. No
//! nested structure is built here; block structure is discovered at execution
//! time by the control-flow resolver's scans.

use crate::engine::error::CompileError;
use crate::engine::opcode::{Opcode, Predicate};

/// One parsed script line. The raw text is kept for the trace display.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub raw: String,
}

/// An immutable, 0-indexed instruction sequence, compiled once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Compile script text into a program.
///
/// Every line must parse into a known opcode with a well-formed argument;
/// unknown names fail here, before execution can produce wrong motion.
pub fn compile(script: &str) -> Result<Program, CompileError> {
    let mut instructions = Vec::new();

    for (index, raw_line) in script.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            return Err(CompileError::EmptyLine { line });
        }

        let mut tokens = trimmed.split_whitespace();
        let Some(name) = tokens.next() else {
            return Err(CompileError::EmptyLine { line });
        };

        let opcode = parse_opcode(name, &mut tokens, line)?;
        instructions.push(Instruction {
            opcode,
            raw: trimmed.to_string(),
        });
    }

    if instructions.is_empty() {
        return Err(CompileError::EmptyProgram);
    }

    Ok(Program { instructions })
}

fn parse_opcode<'a>(
    name: &str,
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Opcode, CompileError> {
    match name {
        "MOVE_FORWARD" => Ok(Opcode::MoveForward),
        "TURN_LEFT" => Ok(Opcode::TurnLeft),
        "TURN_RIGHT" => Ok(Opcode::TurnRight),
        "ENDWHILE" => Ok(Opcode::EndWhile),
        "ELSE" => Ok(Opcode::Else),
        "ENDIF" => Ok(Opcode::EndIf),
        "GOTO" => {
            let arg = tokens.next().ok_or(CompileError::MissingArgument {
                line,
                opcode: "GOTO",
            })?;
            let target = arg.parse::<u32>().map_err(|_| CompileError::BadJumpTarget {
                line,
                token: arg.to_string(),
            })?;
            Ok(Opcode::Goto(target))
        }
        "WHILE" => Ok(Opcode::While(parse_predicate(tokens, "WHILE", line)?)),
        "IF" => Ok(Opcode::If(parse_predicate(tokens, "IF", line)?)),
        _ => Err(CompileError::UnknownOpcode {
            line,
            token: name.to_string(),
        }),
    }
}

fn parse_predicate<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    opcode: &'static str,
    line: usize,
) -> Result<Predicate, CompileError> {
    let arg = tokens
        .next()
        .ok_or(CompileError::MissingArgument { line, opcode })?;
    Predicate::parse(arg).ok_or_else(|| CompileError::UnknownPredicate {
        line,
        token: arg.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_straight_line_script() {
        let program = compile("MOVE_FORWARD\nTURN_RIGHT\nMOVE_FORWARD").unwrap();
        assert_eq!(program.len(), 3);
        assert_eq!(program.instructions[0].opcode, Opcode::MoveForward);
        assert_eq!(program.instructions[1].opcode, Opcode::TurnRight);
        assert_eq!(program.instructions[1].raw, "TURN_RIGHT");
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let program = compile("  MOVE_FORWARD \n\tWHILE  TRUE\nENDWHILE").unwrap();
        assert_eq!(
            program.instructions[1].opcode,
            Opcode::While(Predicate::True)
        );
        assert_eq!(program.instructions[1].raw, "WHILE  TRUE");
    }

    #[test]
    fn rejects_unknown_opcode() {
        let err = compile("MOVE_FORWARD\nFLY").unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownOpcode {
                line: 2,
                token: "FLY".to_string()
            }
        );
    }

    #[test]
    fn rejects_empty_line() {
        let err = compile("MOVE_FORWARD\n\nTURN_LEFT").unwrap_err();
        assert_eq!(err, CompileError::EmptyLine { line: 2 });
    }

    #[test]
    fn rejects_empty_script() {
        assert_eq!(compile("").unwrap_err(), CompileError::EmptyProgram);
    }

    #[test]
    fn goto_requires_a_numeric_target() {
        assert_eq!(
            compile("GOTO").unwrap_err(),
            CompileError::MissingArgument {
                line: 1,
                opcode: "GOTO"
            }
        );
        assert_eq!(
            compile("GOTO up").unwrap_err(),
            CompileError::BadJumpTarget {
                line: 1,
                token: "up".to_string()
            }
        );
        assert_eq!(
            compile("GOTO 7").unwrap().instructions[0].opcode,
            Opcode::Goto(7)
        );
    }

    #[test]
    fn branch_predicates_are_validated_at_compile_time() {
        assert_eq!(
            compile("IF FRONT_IS_LOCKED\nENDIF").unwrap_err(),
            CompileError::UnknownPredicate {
                line: 1,
                token: "FRONT_IS_LOCKED".to_string()
            }
        );
        assert_eq!(
            compile("WHILE").unwrap_err(),
            CompileError::MissingArgument {
                line: 1,
                opcode: "WHILE"
            }
        );
    }
}
