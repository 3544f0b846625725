// Prompt templates for every generation mode.
// Placeholders: {requirement}, plus {json_instruction}/{example_lead_in}/{example}
// for the structured modes. {requirement} is substituted last so caller text is
// never re-expanded.

use crate::generation::mode::GenerationMode;
use crate::llm_client::prompts::{EXAMPLE_LEAD_IN, JSON_ONLY_INSTRUCTION};

/// Markdown test cases (positive, negative, boundary).
pub const NARRATIVE_PROMPT_TEMPLATE: &str = r#"Напиши подробные тест-кейсы для следующего требования к функционалу ПО:
{requirement}

Формат вывода:
1. Название тест-кейса
- Предусловия
- Шаги выполнения
- Ожидаемый результат

Сгенерируй как можно больше тест-кейсов разного типа (позитивные, негативные, граничные случаи).
Разметка ответа в формате Markdown."#;

pub const CHECKLIST_PROMPT_TEMPLATE: &str = r#"Составь чек-лист проверок для следующего требования к функционалу ПО:
{requirement}

Каждый пункт чек-листа — одна короткая проверка, сформулированная как утверждение.
Охвати позитивные, негативные и граничные случаи.

{json_instruction}

{example_lead_in}
{example}"#;

pub const TEST_CASES_PROMPT_TEMPLATE: &str = r#"Напиши тест-кейсы для следующего требования к функционалу ПО:
{requirement}

Каждый тест-кейс опиши одной строкой: название, шаги выполнения и ожидаемый результат.
Сгенерируй позитивные, негативные и граничные случаи.

{json_instruction}

{example_lead_in}
{example}"#;

/// Worked example of the checklist output shape.
pub const CHECKLIST_EXAMPLE: &str = r#"{"1": "Форма входа отображает поля логина и пароля", "2": "Ввод корректных логина и пароля открывает доступ в систему", "3": "Ввод неверного пароля показывает сообщение об ошибке"}"#;

/// Worked example of the structured test-case output shape.
pub const TEST_CASES_EXAMPLE: &str = r#"{"1": "Вход с корректными данными: открыть страницу входа, ввести верные логин и пароль, нажать «Войти». Ожидаемый результат: открыта главная страница", "2": "Вход с неверным паролем: ввести верный логин и неверный пароль, нажать «Войти». Ожидаемый результат: сообщение «Неверный логин или пароль»"}"#;

/// Worked example embedded in the prompt for `mode`, if any.
pub fn worked_example(mode: GenerationMode) -> Option<&'static str> {
    match mode {
        GenerationMode::Narrative => None,
        GenerationMode::Checklist => Some(CHECKLIST_EXAMPLE),
        GenerationMode::StructuredCases => Some(TEST_CASES_EXAMPLE),
    }
}

/// Builds the final prompt sent to the model. Total over its inputs: the
/// requirement is embedded verbatim, without length limits or escaping.
pub fn build_prompt(mode: GenerationMode, requirement: &str) -> String {
    let template = match mode {
        GenerationMode::Narrative => NARRATIVE_PROMPT_TEMPLATE,
        GenerationMode::Checklist => CHECKLIST_PROMPT_TEMPLATE,
        GenerationMode::StructuredCases => TEST_CASES_PROMPT_TEMPLATE,
    };

    let mut prompt = template.to_string();
    if let Some(example) = worked_example(mode) {
        prompt = prompt
            .replace("{json_instruction}", JSON_ONLY_INSTRUCTION)
            .replace("{example_lead_in}", EXAMPLE_LEAD_IN)
            .replace("{example}", example);
    }
    prompt.replace("{requirement}", requirement)
}
