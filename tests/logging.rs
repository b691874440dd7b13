#[macro_use] extern crate log;

use rsp2_symmetry::{GlobalLogger, Error, Settings, spacegroup_of};

mod shared;

// Only one logger may be installed per process, so everything
// happens in a single test.
#[test]
fn logger_writes_to_file() {
    let path = std::env::temp_dir().join(format!("rsp2-symmetry-test-{}.log", std::process::id()));

    GlobalLogger::default()
        .path(&path)
        .verbosity(1)
        .apply()
        .unwrap();

    info!("hello from the test");
    let info = spacegroup_of(&shared::rutile(), &Settings::default()).unwrap();
    assert_eq!(info.number, 136);
    log::logger().flush();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("hello from the test"));
    assert!(text.contains("[rsp2_spacegroup]") || text.contains("[rsp2_symmetry]"));

    match GlobalLogger::default().apply() {
        Err(Error::Logger(_)) => {},
        r => panic!("{:?}", r),
    }
    let _ = std::fs::remove_file(&path);
}
