use flexi_logger::{DeferredNow, Record, style};

/// `LEVEL message`, with the level coloured when the terminal supports it.
pub fn cli_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    let level = record.level();
    write!(
        w,
        "{} {}",
        style(level).paint(level.to_string()),
        record.args()
    )
}
