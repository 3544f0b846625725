//! Canned structured result served by `POST /test/` so client integrators
//! (the browser extension) can build against a stable shape without a model.

use anyhow::{Context, Result};

use crate::generation::CaseMap;

pub const EXAMPLE_RESULT_JSON: &str = r#"{
  "1": "Форма входа отображает поля «Логин» и «Пароль» и кнопку «Войти»",
  "2": "Ввод корректных логина и пароля открывает главную страницу",
  "3": "Ввод неверного пароля показывает сообщение «Неверный логин или пароль»",
  "4": "Кнопка «Войти» неактивна, пока оба поля пустые",
  "5": "Пароль длиной 128 символов принимается, 129 символов — отклоняется"
}"#;

/// Parses the canned result. Called once at startup; an error here is a
/// deployment defect and aborts the process.
pub fn load_example() -> Result<CaseMap> {
    serde_json::from_str(EXAMPLE_RESULT_JSON).context("EXAMPLE_RESULT_JSON is not a valid case map")
}
