use crate::config::AgentDefaults;
use crate::session::SessionController;

pub struct ServerState {
    controller: SessionController,
    defaults: AgentDefaults,
}

impl ServerState {
    pub fn new(controller: SessionController, defaults: AgentDefaults) -> Self {
        Self {
            controller,
            defaults,
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn defaults(&self) -> &AgentDefaults {
        &self.defaults
    }
}
