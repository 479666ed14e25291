use async_trait::async_trait;

use crate::domain::{ports::Tool, AgentError};

/// Reports the current date from the system clock. Ignores its input.
pub struct TodayTool;

#[async_trait]
impl Tool for TodayTool {
    fn name(&self) -> &str {
        "get_today_date"
    }

    fn description(&self) -> &str {
        "Retorna la fecha actual. Ideal para preguntas sobre 'hoy', 'fecha' o 'día'. \
         Ignora cualquier input que se le pase."
    }

    async fn call(&self, _input: &str) -> Result<String, AgentError> {
        Ok(chrono::Local::now().date_naive().to_string())
    }
}
