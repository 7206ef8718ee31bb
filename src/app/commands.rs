//! Inbound panel commands.
//!
//! The two front-panel buttons only produce edges; this is where each
//! edge gets its meaning before the FSM sees it.

use crate::app::ports::DigitalInput;

/// Actions the front panel can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    /// Toggle between Off and powered.
    TogglePower,

    /// Begin a wash cycle with the current pot settings.
    StartCycle,
}

impl PanelCommand {
    /// Semantic action bound to a physical button.
    pub fn for_button(button: DigitalInput) -> Self {
        match button {
            DigitalInput::PowerButton => Self::TogglePower,
            DigitalInput::StartButton => Self::StartCycle,
        }
    }
}

/// Commands collected during one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelInput {
    pub power_pressed: bool,
    pub start_pressed: bool,
}

impl PanelInput {
    pub fn record(&mut self, cmd: PanelCommand) {
        match cmd {
            PanelCommand::TogglePower => self.power_pressed = true,
            PanelCommand::StartCycle => self.start_pressed = true,
        }
    }

    pub fn any(&self) -> bool {
        self.power_pressed || self.start_pressed
    }
}
