//! The instruction vocabulary.
//!
//! Opcodes and boundary predicates are closed enums with typed argument
//! shapes, so a typo'd instruction can never compile into a program. The
//! opcode table of the original design survives as `Opcode::activate`, which
//! hands out a fresh, stateful action handler per activation.

use crate::engine::action::{Action, Motion, TURN_DEGREES};
use crate::types::{Direction, Turn};
use crate::world::World;

/// A zero-argument world query. Predicates are pure: they are evaluated
/// synchronously while resolving control flow, never ticked per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    True,
    False,
    FrontIsBlocked,
    FrontIsNotBlocked,
    NorthIsBlocked,
    NorthIsNotBlocked,
    WestIsBlocked,
    WestIsNotBlocked,
    SouthIsBlocked,
    SouthIsNotBlocked,
    EastIsBlocked,
    EastIsNotBlocked,
    OnTarget,
    NotOnTarget,
    FacingNorth,
    FacingWest,
    FacingSouth,
    FacingEast,
}

impl Predicate {
    pub fn parse(token: &str) -> Option<Self> {
        let p = match token {
            "TRUE" => Predicate::True,
            "FALSE" => Predicate::False,
            "FRONT_IS_BLOCKED" => Predicate::FrontIsBlocked,
            "FRONT_IS_NOT_BLOCKED" => Predicate::FrontIsNotBlocked,
            "NORTH_IS_BLOCKED" => Predicate::NorthIsBlocked,
            "NORTH_IS_NOT_BLOCKED" => Predicate::NorthIsNotBlocked,
            "WEST_IS_BLOCKED" => Predicate::WestIsBlocked,
            "WEST_IS_NOT_BLOCKED" => Predicate::WestIsNotBlocked,
            "SOUTH_IS_BLOCKED" => Predicate::SouthIsBlocked,
            "SOUTH_IS_NOT_BLOCKED" => Predicate::SouthIsNotBlocked,
            "EAST_IS_BLOCKED" => Predicate::EastIsBlocked,
            "EAST_IS_NOT_BLOCKED" => Predicate::EastIsNotBlocked,
            "ROBOT_IS_ON_TARGET" => Predicate::OnTarget,
            "ROBOT_IS_NOT_ON_TARGET" => Predicate::NotOnTarget,
            "ROBOT_IS_FACING_NORTH" => Predicate::FacingNorth,
            "ROBOT_IS_FACING_WEST" => Predicate::FacingWest,
            "ROBOT_IS_FACING_SOUTH" => Predicate::FacingSouth,
            "ROBOT_IS_FACING_EAST" => Predicate::FacingEast,
            _ => return None,
        };
        Some(p)
    }

    pub fn eval<W: World + ?Sized>(self, world: &W) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::FrontIsBlocked => world.front_is_blocked(),
            Predicate::FrontIsNotBlocked => !world.front_is_blocked(),
            Predicate::NorthIsBlocked => world.is_blocked(Direction::North),
            Predicate::NorthIsNotBlocked => !world.is_blocked(Direction::North),
            Predicate::WestIsBlocked => world.is_blocked(Direction::West),
            Predicate::WestIsNotBlocked => !world.is_blocked(Direction::West),
            Predicate::SouthIsBlocked => world.is_blocked(Direction::South),
            Predicate::SouthIsNotBlocked => !world.is_blocked(Direction::South),
            Predicate::EastIsBlocked => world.is_blocked(Direction::East),
            Predicate::EastIsNotBlocked => !world.is_blocked(Direction::East),
            Predicate::OnTarget => world.is_on_target(),
            Predicate::NotOnTarget => !world.is_on_target(),
            Predicate::FacingNorth => world.is_facing(Direction::North),
            Predicate::FacingWest => world.is_facing(Direction::West),
            Predicate::FacingSouth => world.is_facing(Direction::South),
            Predicate::FacingEast => world.is_facing(Direction::East),
        }
    }
}

/// One instruction's operation, with its argument baked in at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    MoveForward,
    TurnLeft,
    TurnRight,
    /// 1-based target line.
    Goto(u32),
    While(Predicate),
    EndWhile,
    If(Predicate),
    Else,
    EndIf,
}

impl Opcode {
    pub fn name(self) -> &'static str {
        match self {
            Opcode::MoveForward => "MOVE_FORWARD",
            Opcode::TurnLeft => "TURN_LEFT",
            Opcode::TurnRight => "TURN_RIGHT",
            Opcode::Goto(_) => "GOTO",
            Opcode::While(_) => "WHILE",
            Opcode::EndWhile => "ENDWHILE",
            Opcode::If(_) => "IF",
            Opcode::Else => "ELSE",
            Opcode::EndIf => "ENDIF",
        }
    }

    /// Construct a fresh action handler for one activation of this opcode.
    ///
    /// Motion opcodes get an amortized handler that spreads their quantity
    /// over the instruction window; everything else fires once on first tick.
    pub fn activate(self) -> Action {
        match self {
            Opcode::MoveForward => Action::amortized(Motion::Advance, 1.0),
            Opcode::TurnLeft => Action::amortized(Motion::Turn(Turn::Left), TURN_DEGREES),
            Opcode::TurnRight => Action::amortized(Motion::Turn(Turn::Right), TURN_DEGREES),
            Opcode::Goto(_)
            | Opcode::While(_)
            | Opcode::EndWhile
            | Opcode::If(_)
            | Opcode::Else
            | Opcode::EndIf => Action::instant(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, Direction};
    use crate::world::{GridWorld, terrain::Terrain};

    fn open_world() -> GridWorld {
        GridWorld::new(
            Terrain::flat(5, 5),
            Coord::new(2, 2, 1),
            Direction::North,
            Coord::new(4, 4, 1),
        )
    }

    #[test]
    fn parse_rejects_unknown_predicate() {
        assert_eq!(Predicate::parse("FRONT_IS_BLOCKED"), Some(Predicate::FrontIsBlocked));
        assert_eq!(Predicate::parse("FRONT_BLOCKED"), None);
        assert_eq!(Predicate::parse(""), None);
    }

    #[test]
    fn facing_predicates_track_orientation() {
        let w = open_world();
        assert!(Predicate::FacingNorth.eval(&w));
        assert!(!Predicate::FacingEast.eval(&w));
        assert!(Predicate::True.eval(&w));
        assert!(!Predicate::False.eval(&w));
    }

    #[test]
    fn negated_predicates_mirror_their_pair() {
        let w = open_world();
        assert_ne!(
            Predicate::OnTarget.eval(&w),
            Predicate::NotOnTarget.eval(&w)
        );
        assert_ne!(
            Predicate::FrontIsBlocked.eval(&w),
            Predicate::FrontIsNotBlocked.eval(&w)
        );
    }
}
