// Shared prompt fragments.
// Each mode's full template lives in generation::prompts; this file holds the
// pieces every JSON-mode prompt reuses.

/// Appended to every structured-mode prompt. Ollama's JSON mode only
/// guarantees syntax, so the shape is also spelled out in words.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Ответ дай строго в формате JSON-объекта, где ключ — порядковый номер в виде строки (\"1\", \"2\", ...), \
а значение — строка с описанием. \
Не добавляй никакого текста вне JSON. \
Не используй блоки кода Markdown.";

/// Lead-in line placed right before the worked example.
pub const EXAMPLE_LEAD_IN: &str = "Пример формата ответа:";
