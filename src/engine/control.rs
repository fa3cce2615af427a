//! The control-flow resolver.
//!
//! Branch, loop, and jump opcodes rewrite the program counter by scanning the
//! flat instruction list for their markers at execution time; no jump table is
//! precomputed. Scans stop at the *first* matching marker: control flow is
//! single-level, and nested blocks of the same kind will resolve to the wrong
//! terminator.
//!
//! A rewrite is recorded as a pending override rather than applied directly;
//! the executor consumes it when the current instruction's window closes.

use crate::engine::error::ExecError;
use crate::engine::opcode::Opcode;
use crate::engine::program::Instruction;
use crate::world::World;

/// Transient control-flow state owned by the executor.
#[derive(Debug, Clone, Default)]
pub struct Flow {
    /// Index the next advance should land on, when a resolver rewrote it.
    pub pending: Option<usize>,
    /// Index of the active loop's header, if execution is inside a loop body.
    pub loop_header: Option<usize>,
}

/// Execute the control effect of the instantaneous opcode at `pc`.
///
/// Motion opcodes have no control effect and never reach this point through
/// the executor, but the match stays total.
pub fn execute<W: World + ?Sized>(
    instructions: &[Instruction],
    pc: usize,
    world: &W,
    flow: &mut Flow,
) -> Result<(), ExecError> {
    let opcode = instructions[pc].opcode;
    match opcode {
        Opcode::Goto(target) => {
            let len = instructions.len();
            if target == 0 || target as usize > len {
                return Err(ExecError::JumpOutOfRange {
                    index: pc,
                    target,
                    len,
                });
            }
            flow.pending = Some(target as usize - 1);
        }

        Opcode::While(predicate) => {
            if predicate.eval(world) {
                flow.loop_header = Some(pc);
            } else {
                // Loop not entered (or finished): land on the terminator,
                // which no-ops because no loop context is active.
                flow.loop_header = None;
                let end = scan(instructions, pc + 1, |op| matches!(op, Opcode::EndWhile))
                    .ok_or(ExecError::MissingTerminator {
                        opcode: opcode.name(),
                        index: pc,
                        wanted: "ENDWHILE",
                    })?;
                flow.pending = Some(end);
            }
        }

        Opcode::EndWhile => {
            // Land back on the header so its predicate decides re-iteration.
            if let Some(header) = flow.loop_header {
                flow.pending = Some(header);
            }
        }

        Opcode::If(predicate) => {
            if !predicate.eval(world) {
                let marker = scan(instructions, pc + 1, |op| {
                    matches!(op, Opcode::Else | Opcode::EndIf)
                })
                .ok_or(ExecError::MissingTerminator {
                    opcode: opcode.name(),
                    index: pc,
                    wanted: "ELSE or ENDIF",
                })?;
                flow.pending = match instructions[marker].opcode {
                    // Resume inside the alternate body, past the marker.
                    Opcode::Else if marker + 1 < instructions.len() => Some(marker + 1),
                    Opcode::Else => {
                        return Err(ExecError::MissingTerminator {
                            opcode: opcode.name(),
                            index: pc,
                            wanted: "ENDIF",
                        });
                    }
                    // Land on the terminator itself; it no-ops.
                    _ => Some(marker),
                };
            }
        }

        Opcode::Else => {
            // Reached by fall-through, so the branch was taken: skip the
            // alternate body entirely by landing on the terminator.
            let end = scan(instructions, pc + 1, |op| matches!(op, Opcode::EndIf)).ok_or(
                ExecError::MissingTerminator {
                    opcode: opcode.name(),
                    index: pc,
                    wanted: "ENDIF",
                },
            )?;
            flow.pending = Some(end);
        }

        Opcode::EndIf => {}

        Opcode::MoveForward | Opcode::TurnLeft | Opcode::TurnRight => {}
    }

    Ok(())
}

/// First instruction at or after `from` whose opcode matches.
fn scan(
    instructions: &[Instruction],
    from: usize,
    matches: impl Fn(&Opcode) -> bool,
) -> Option<usize> {
    instructions
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, inst)| matches(&inst.opcode))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::program::compile;
    use crate::types::{Coord, Direction};
    use crate::world::{GridWorld, terrain::Terrain};

    fn open_world() -> GridWorld {
        GridWorld::new(
            Terrain::flat(5, 5),
            Coord::new(0, 0, 1),
            Direction::North,
            Coord::new(4, 4, 1),
        )
    }

    fn resolve(script: &str, pc: usize, flow: &mut Flow) -> Result<(), ExecError> {
        let program = compile(script).unwrap();
        execute(&program.instructions, pc, &open_world(), flow)
    }

    #[test]
    fn goto_lands_on_one_based_target() {
        let mut flow = Flow::default();
        resolve("TURN_LEFT\nGOTO 1\nTURN_RIGHT", 1, &mut flow).unwrap();
        assert_eq!(flow.pending, Some(0));
    }

    #[test]
    fn goto_out_of_range_is_fatal() {
        let mut flow = Flow::default();
        let err = resolve("GOTO 9", 0, &mut flow).unwrap_err();
        assert_eq!(
            err,
            ExecError::JumpOutOfRange {
                index: 0,
                target: 9,
                len: 1
            }
        );
        let err = resolve("GOTO 0", 0, &mut flow).unwrap_err();
        assert!(matches!(err, ExecError::JumpOutOfRange { target: 0, .. }));
    }

    #[test]
    fn while_true_records_loop_header_and_falls_through() {
        let mut flow = Flow::default();
        resolve("WHILE TRUE\nMOVE_FORWARD\nENDWHILE", 0, &mut flow).unwrap();
        assert_eq!(flow.loop_header, Some(0));
        assert_eq!(flow.pending, None);
    }

    #[test]
    fn while_false_lands_on_terminator() {
        let mut flow = Flow::default();
        resolve("WHILE FALSE\nMOVE_FORWARD\nENDWHILE", 0, &mut flow).unwrap();
        assert_eq!(flow.loop_header, None);
        assert_eq!(flow.pending, Some(2));
    }

    #[test]
    fn endwhile_jumps_back_only_with_active_context() {
        let script = "WHILE TRUE\nMOVE_FORWARD\nENDWHILE";

        let mut flow = Flow {
            pending: None,
            loop_header: Some(0),
        };
        resolve(script, 2, &mut flow).unwrap();
        assert_eq!(flow.pending, Some(0));

        let mut flow = Flow::default();
        resolve(script, 2, &mut flow).unwrap();
        assert_eq!(flow.pending, None);
    }

    #[test]
    fn while_without_terminator_is_fatal() {
        let mut flow = Flow::default();
        let err = resolve("WHILE FALSE\nMOVE_FORWARD", 0, &mut flow).unwrap_err();
        assert_eq!(
            err,
            ExecError::MissingTerminator {
                opcode: "WHILE",
                index: 0,
                wanted: "ENDWHILE"
            }
        );
    }

    #[test]
    fn if_true_falls_through() {
        let mut flow = Flow::default();
        resolve("IF TRUE\nTURN_LEFT\nENDIF", 0, &mut flow).unwrap();
        assert_eq!(flow.pending, None);
    }

    #[test]
    fn if_false_skips_to_after_else() {
        let mut flow = Flow::default();
        resolve("IF FALSE\nTURN_LEFT\nELSE\nTURN_RIGHT\nENDIF", 0, &mut flow).unwrap();
        assert_eq!(flow.pending, Some(3));
    }

    #[test]
    fn if_false_without_else_lands_on_endif() {
        let mut flow = Flow::default();
        resolve("IF FALSE\nTURN_LEFT\nENDIF", 0, &mut flow).unwrap();
        assert_eq!(flow.pending, Some(2));
    }

    #[test]
    fn else_reached_by_fall_through_skips_alternate() {
        let mut flow = Flow::default();
        resolve("IF TRUE\nTURN_LEFT\nELSE\nTURN_RIGHT\nENDIF", 2, &mut flow).unwrap();
        assert_eq!(flow.pending, Some(4));
    }

    #[test]
    fn if_without_terminator_is_fatal() {
        let mut flow = Flow::default();
        let err = resolve("IF FALSE\nTURN_LEFT", 0, &mut flow).unwrap_err();
        assert!(matches!(err, ExecError::MissingTerminator { opcode: "IF", .. }));
    }
}
