use proptest::prelude::*;

use proc_supervisor::query::{parse_process_records, ProcessRecord};

fn record_strategy() -> impl Strategy<Value = ProcessRecord> {
    ("[A-Za-z][A-Za-z0-9._-]{0,20}", 1u32..=4_194_304).prop_map(|(name, pid)| ProcessRecord {
        name,
        pid,
    })
}

fn render(record: &ProcessRecord) -> String {
    format!(
        "{{\n    \"ProcessName\":  \"{}\",\n    \"Id\":  {}\n}}",
        record.name, record.pid
    )
}

proptest! {
    // PowerShell prints a bare object for a single match and an array otherwise.
    #[test]
    fn single_object_parses_like_singleton_array(record in record_strategy()) {
        let bare = render(&record);
        let wrapped = format!("[{bare}]");

        let from_bare = parse_process_records(&bare).unwrap();
        let from_array = parse_process_records(&wrapped).unwrap();

        prop_assert_eq!(&from_bare, &from_array);
        prop_assert_eq!(from_bare, vec![record]);
    }

    #[test]
    fn arrays_keep_every_record_in_order(records in proptest::collection::vec(record_strategy(), 1..8)) {
        let body: Vec<String> = records.iter().map(render).collect();
        let output = format!("[\r\n{}\r\n]\r\n", body.join(",\r\n"));

        let parsed = parse_process_records(&output).unwrap();

        prop_assert_eq!(parsed, records);
    }
}
