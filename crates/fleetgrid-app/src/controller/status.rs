//! Status line texts

pub const NO_DATA: &str = "Файл ещё не загружен.";
pub const PICK_DAY: &str = "Выберите дату";
pub const COUNTING: &str = "Считаю...";
pub const LOADING: &str = "Загружаю...";
pub const UPLOADED: &str = "Загружено.";
pub const UPLOAD_FAILED: &str = "Ошибка загрузки";
pub const PICK_XLSX: &str = "Выберите файл .xlsx";
pub const FETCH_FAILED: &str = "Не удалось получить данные";
pub const EXPORTED: &str = "Файл сохранён";
pub const EXPORT_FAILED: &str = "Ошибка выгрузки";

pub const SAVING: &str = "Сохраняю...";
pub const SAVED: &str = "Сохранено";
pub const SAVE_FAILED: &str = "Ошибка сохранения";
pub const RESETTING: &str = "Сбрасываю...";
pub const RESET_DONE: &str = "Сброшено";
pub const RESET_FAILED: &str = "Ошибка сброса";

/// Directory row counter ("Строк: 12")
pub fn row_count(n: usize) -> String {
    format!("Строк: {}", n)
}

/// Inline upsert failure with the server's text
pub fn server_error(text: &str) -> String {
    format!("Ошибка: {}", text)
}
