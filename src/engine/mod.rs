//! The instruction execution engine.
//!
//! A cooperative, frame-driven interpreter: the host calls `Executor::step`
//! once per animation frame with the elapsed milliseconds, and the executor
//! amortizes each instruction over a fixed window so a 1-second action looks
//! the same at 30 fps and at 144 fps. It never schedules itself and never
//! blocks; the world is only touched through the `World` trait.
//!
//! Exactly one instruction is active at a time. When an instruction's window
//! closes, the program counter advances (honoring any rewrite the control-flow
//! resolver recorded) and the observer is told which instruction runs next.

pub mod action;
pub mod control;
pub mod error;
pub mod opcode;
pub mod program;

use action::{Action, WINDOW_MS};
use control::Flow;
use error::ExecError;
use program::{Instruction, Program};

use crate::world::World;

/// Called once when execution begins and once per instruction advance, with
/// the full instruction list and the index now executing. Drives the script
/// trace display.
pub type Observer<'a> = &'a mut dyn FnMut(&[Instruction], usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Terminal: the last instruction's window closed. Stepping is a no-op
    /// and the host should stop scheduling frames.
    Stopped,
}

/// The execution state: program, counter, live handler, and window clock.
/// `step` is the sole mutating entry point.
pub struct Executor {
    program: Program,
    pc: usize,
    active: Action,
    window_elapsed_ms: f64,
    flow: Flow,
    status: Status,
}

impl Executor {
    pub fn new(program: Program) -> Self {
        let (active, status) = match program.instructions.first() {
            Some(inst) => (inst.opcode.activate(), Status::Running),
            None => (Action::Noop, Status::Stopped),
        };
        Executor {
            program,
            pc: 0,
            active,
            window_elapsed_ms: 0.0,
            flow: Flow::default(),
            status,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Index of the instruction currently executing.
    pub fn current_index(&self) -> usize {
        self.pc
    }

    pub fn is_stopped(&self) -> bool {
        self.status == Status::Stopped
    }

    /// Emit the initial observer notification for instruction 0.
    pub fn begin(&mut self, observer: Observer) {
        if self.status == Status::Running {
            observer(&self.program.instructions, self.pc);
        }
    }

    /// Advance execution by one frame of `delta_ms` elapsed time.
    ///
    /// Control-flow errors are fatal: the executor stops and the error is
    /// returned to the host.
    pub fn step<W: World + ?Sized>(
        &mut self,
        delta_ms: f64,
        world: &mut W,
        observer: Observer,
    ) -> Result<(), ExecError> {
        if self.status == Status::Stopped {
            return Ok(());
        }

        if self.active.take_fire() {
            if let Err(err) = control::execute(&self.program.instructions, self.pc, world, &mut self.flow)
            {
                self.status = Status::Stopped;
                self.active = Action::Noop;
                return Err(err);
            }
        } else {
            self.active.tick(delta_ms, world);
        }

        self.window_elapsed_ms += delta_ms;
        if self.window_elapsed_ms > WINDOW_MS {
            self.window_elapsed_ms = 0.0;
            self.advance(observer);
        }

        Ok(())
    }

    /// Move to the next instruction, or stop if the one that just completed
    /// was the last and no rewrite redirects execution.
    fn advance(&mut self, observer: Observer) {
        let at_last = self.flow.pending.is_none() && self.pc + 1 == self.program.len();
        if at_last {
            self.active = Action::Noop;
            self.status = Status::Stopped;
            return;
        }

        self.pc = self.flow.pending.take().unwrap_or(self.pc + 1);
        self.active = self.program.instructions[self.pc].opcode.activate();
        observer(&self.program.instructions, self.pc);
    }
}
