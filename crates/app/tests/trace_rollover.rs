//! Daily trace files: content of one session and FIFO retention across a
//! week of sessions with a five-day limit.

mod common;

use common::{at, build};

use terra_app::trace::TraceKind;

#[test]
fn should_keep_only_the_newest_files_after_a_week() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = build(dir.path(), terra_app::settings::Settings::default(), at(0, 0, 0, 0));

    // One trace session per day for seven days, five-day retention.
    for day in 0..7 {
        t.set_now(at(day, 0, 0, 0));
        t.set_trace(true);
        t.set_now(at(day, 23, 59, 0));
        t.set_trace(false);
    }

    let files = t.trace_files(TraceKind::State).unwrap();
    assert_eq!(
        files,
        vec![
            "state_20210110",
            "state_20210111",
            "state_20210112",
            "state_20210113",
            "state_20210114",
        ]
    );
    let temp_files = t.trace_files(TraceKind::Temperature).unwrap();
    assert_eq!(temp_files.len(), 5);
    assert_eq!(temp_files[0], "temp_20210110");
}

#[test]
fn should_write_start_device_lines_and_stop_marker() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = build(dir.path(), terra_app::settings::Settings::default(), at(0, 0, 0, 0));

    t.set_trace(true);
    t.set_now(at(0, 23, 59, 0));
    t.set_trace(false);

    let content = t.trace_file(TraceKind::State, "state_20210108").unwrap();
    let lines: Vec<&str> = content.lines().collect();
    // start marker, one line per device, stop marker
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "2021-01-08 00:00:00 start");
    assert_eq!(lines[1], "2021-01-08 00:00:00 light1 0");
    assert_eq!(lines[11], "2021-01-08 00:00:00 fan_out 0");
    assert_eq!(lines[12], "2021-01-08 23:59:00 stop");
}

#[test]
fn should_rotate_into_a_new_file_after_a_full_day() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = build(dir.path(), terra_app::settings::Settings::default(), at(0, 10, 0, 0));

    t.set_trace(true);
    assert!(t.is_trace_on());

    t.set_now(at(1, 10, 0, 0));
    t.check_trace();
    assert!(t.is_trace_on());

    let files = t.trace_files(TraceKind::State).unwrap();
    assert_eq!(files, vec!["state_20210108", "state_20210109"]);
    let old = t.trace_file(TraceKind::State, "state_20210108").unwrap();
    assert!(old.trim_end().ends_with("stop"));
}
