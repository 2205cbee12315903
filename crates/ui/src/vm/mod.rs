mod attempt_vm;
mod performance_vm;
mod time_fmt;

pub use attempt_vm::{
    AttemptIntent, AttemptVm, OptionVm, PaletteCellVm, is_perfect, option_class, palette_class,
    score_line, start_section_attempt, start_syllabus_attempt,
};
pub use performance_vm::{HistoryRowVm, map_history_rows, stats_line};
pub use time_fmt::{format_datetime, format_elapsed};
