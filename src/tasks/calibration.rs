use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::application::{ask, correct_sum, AnswerSubmitter, ChatClient, Container, Task};
use crate::connector::{AppConfig, HttpSource, ReportSubmitter};
use crate::domain::DomainError;

const MODEL: &str = "gpt-3.5-turbo";
const SYSTEM_PROMPT: &str =
    "I return only the answer to the question, nothing else. My answers are very concise";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenQuestion {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub q: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub a: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationItem {
    pub question: String,
    pub answer: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<OpenQuestion>,
}

/// The calibration document, in the field order the grader expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationFile {
    #[serde(default)]
    pub apikey: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub copyright: String,
    #[serde(rename = "test-data", default)]
    pub test_data: Vec<CalibrationItem>,
}

impl CalibrationFile {
    /// Recomputes every arithmetic answer. Returns how many were wrong.
    pub fn fix_sums(&mut self) -> Result<usize, DomainError> {
        let mut fixed = 0;
        for item in &mut self.test_data {
            let correct = correct_sum(&item.question, item.answer)?;
            if correct != item.answer {
                item.answer = correct;
                fixed += 1;
            }
        }
        Ok(fixed)
    }

    /// Fills in every embedded open question with the model's answer.
    pub async fn answer_open_questions<C>(&mut self, llm: &C) -> Result<usize, DomainError>
    where
        C: ChatClient + ?Sized,
    {
        let mut answered = 0;
        for test in self.test_data.iter_mut().filter_map(|item| item.test.as_mut()) {
            test.a = ask(llm, MODEL, SYSTEM_PROMPT, &test.q).await?.trim().to_string();
            answered += 1;
        }
        Ok(answered)
    }
}

/// Repairs the calibration file and reports it to the calibration endpoint.
pub struct CalibrationTask {
    source: HttpSource,
    input_url: String,
    report_url: String,
    api_key: String,
    timeout: Duration,
}

impl CalibrationTask {
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        Ok(Self {
            source: config.http_source()?,
            input_url: config.data_url("json.txt")?,
            report_url: config.calibration_report_url()?,
            api_key: config.ai_devs_key.clone(),
            timeout: config.request_timeout,
        })
    }
}

#[async_trait]
impl Task for CalibrationTask {
    fn name(&self) -> &str {
        "JSON"
    }

    async fn solve(&self, container: &Container) -> Result<Value, DomainError> {
        let llm = container.llm()?;

        let mut file: CalibrationFile = self.source.fetch_json(&self.input_url).await?;
        file.apikey = self.api_key.clone();

        let fixed = file.fix_sums()?;
        let answered = file.answer_open_questions(llm.as_ref()).await?;
        info!(
            "Calibration: {} items, {} sums fixed, {} open questions answered",
            file.test_data.len(),
            fixed,
            answered
        );

        serde_json::to_value(file)
            .map_err(|e| DomainError::serialization(format!("calibration file: {e}")))
    }

    fn submitter(&self, _container: &Container) -> Result<Arc<dyn AnswerSubmitter>, DomainError> {
        Ok(Arc::new(ReportSubmitter::new(
            &self.report_url,
            &self.api_key,
            self.timeout,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{CompletionRequest, CompletionResult};

    const INPUT: &str = r#"{
        "apikey": "%PUT-YOUR-API-KEY-HERE%",
        "description": "calibration",
        "copyright": "Copyright (C) 2238",
        "test-data": [
            {"question": "45 + 86", "answer": 131},
            {"question": "97 + 34", "answer": 132},
            {"question": "3 + 57", "answer": 60, "test": {"q": "name of the 2020 USA president", "a": "???"}}
        ]
    }"#;

    struct EchoChat(Mutex<Vec<String>>);

    #[async_trait]
    impl ChatClient for EchoChat {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResult, DomainError> {
            let question = request.messages[1].content.clone();
            self.0.lock().unwrap().push(question);
            Ok(CompletionResult::single(" Joe Biden "))
        }
    }

    #[test]
    fn wrong_sums_are_fixed() {
        let mut file: CalibrationFile = serde_json::from_str(INPUT).unwrap();
        assert_eq!(file.fix_sums().unwrap(), 1);
        assert_eq!(file.test_data[1].answer, 131);
        assert_eq!(file.test_data[0].answer, 131);
    }

    #[tokio::test]
    async fn open_questions_are_answered() {
        let mut file: CalibrationFile = serde_json::from_str(INPUT).unwrap();
        let chat = EchoChat(Mutex::new(Vec::new()));

        assert_eq!(file.answer_open_questions(&chat).await.unwrap(), 1);
        let test = file.test_data[2].test.as_ref().unwrap();
        assert_eq!(test.a, "Joe Biden");
        assert_eq!(
            chat.0.lock().unwrap().as_slice(),
            &["name of the 2020 USA president".to_string()]
        );
    }

    #[test]
    fn serialization_keeps_wire_names_and_order() {
        let mut file: CalibrationFile = serde_json::from_str(INPUT).unwrap();
        file.test_data.truncate(1);
        file.apikey = "k".to_string();
        assert_eq!(
            serde_json::to_string(&file).unwrap(),
            r#"{"apikey":"k","description":"calibration","copyright":"Copyright (C) 2238","test-data":[{"question":"45 + 86","answer":131}]}"#
        );
    }

    #[test]
    fn malformed_question_is_invalid_input() {
        let mut file = CalibrationFile {
            test_data: vec![CalibrationItem {
                question: "what?".to_string(),
                answer: 1,
                test: None,
            }],
            ..CalibrationFile::default()
        };
        assert!(matches!(file.fix_sums(), Err(DomainError::InvalidInput(_))));
    }
}
