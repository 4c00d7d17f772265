use nestlint_core::check_nesting;
use std::fs;
use std::path::Path;

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(format!("tests/fixtures/{name}.txt"));
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

macro_rules! balanced_fixtures {
    ($($name:ident),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                let text = load_fixture(stringify!($name));
                assert!(
                    check_nesting(&text),
                    "Fixture {} should be balanced",
                    stringify!($name)
                );
            }
        )*
    };
}

macro_rules! unbalanced_fixtures {
    ($($name:ident),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                let text = load_fixture(stringify!($name));
                assert!(
                    !check_nesting(&text),
                    "Fixture {} should not be balanced",
                    stringify!($name)
                );
            }
        )*
    };
}

balanced_fixtures!(
    empty,
    no_brackets,
    nested,
    interleaved,
    multiline,
    deeply_nested,
    unicode,
);

unbalanced_fixtures!(
    stray_close,
    unclosed_open,
    crossed_pairs,
    mismatched_kinds,
);
