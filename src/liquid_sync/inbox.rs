//! Buffered gameplay commands awaiting the next liquid step.

use bevy::color::LinearRgba;
use bevy::prelude::Resource;
use log::warn;

use crate::spatial::ObjectId;
use crate::world::LiquidWorld;

/// A change requested by gameplay code for one vessel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiquidCommand {
    /// Sets the fill level, clamped to `[0, 1]`.
    SetFillPercent {
        /// Target vessel.
        vessel: ObjectId,
        /// New fill level.
        percent: f32,
    },
    /// Adds (or with a negative amount removes) litres.
    AddLitres {
        /// Target vessel.
        vessel: ObjectId,
        /// Litres to add.
        litres: f32,
    },
    /// Opens or caps the vessel.
    SetOpen {
        /// Target vessel.
        vessel: ObjectId,
        /// `false` caps it.
        open: bool,
    },
    /// Replaces the liquid colour.
    SetColor {
        /// Target vessel.
        vessel: ObjectId,
        /// New colour.
        color: LinearRgba,
    },
    /// Turns the refill-every-tick behaviour on or off.
    SetEndless {
        /// Target vessel.
        vessel: ObjectId,
        /// Whether to refill.
        endless: bool,
    },
}

impl LiquidCommand {
    /// Vessel the command targets.
    #[must_use]
    pub const fn vessel(&self) -> ObjectId {
        match *self {
            Self::SetFillPercent { vessel, .. }
            | Self::AddLitres { vessel, .. }
            | Self::SetOpen { vessel, .. }
            | Self::SetColor { vessel, .. }
            | Self::SetEndless { vessel, .. } => vessel,
        }
    }

    /// Applies the command, returning `false` when the vessel is unknown.
    pub fn apply(&self, world: &mut LiquidWorld) -> bool {
        let Some(target) = world.get_mut(self.vessel()) else {
            return false;
        };
        let container = &mut target.container;
        match *self {
            Self::SetFillPercent { percent, .. } => container.set_fill_percent(percent),
            Self::AddLitres { litres, .. } => {
                container.set_fill_amount(container.fill_amount() + litres);
            }
            Self::SetOpen { open, .. } => container.set_open(open),
            Self::SetColor { color, .. } => container.set_color(color),
            Self::SetEndless { endless, .. } => target.endless = endless,
        }
        true
    }
}

/// Commands queued since the last step, applied before it runs.
#[derive(Resource, Default)]
pub struct LiquidInbox {
    commands: Vec<LiquidCommand>,
}

impl LiquidInbox {
    /// Queues one command.
    pub fn push(&mut self, command: LiquidCommand) {
        self.commands.push(command);
    }

    /// Queues several commands in order.
    pub fn extend<I>(&mut self, commands: I)
    where
        I: IntoIterator<Item = LiquidCommand>,
    {
        self.commands.extend(commands);
    }

    /// Removes queued commands without applying them.
    pub fn drain(&mut self) -> std::vec::Drain<'_, LiquidCommand> {
        self.commands.drain(..)
    }

    /// `true` when nothing is queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Applies and clears every buffered command in arrival order.
    pub fn apply_all(&mut self, world: &mut LiquidWorld) {
        for command in self.drain() {
            if !command.apply(world) {
                warn!("liquid command for unknown vessel {:?} ignored", command.vessel());
            }
        }
    }
}
