// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bindflow_roster::{DisplayRow, Record};

pub fn record_takkumattsu() -> Record {
    Record::new("takkumattsu", 37)
}

pub fn record_mironal() -> Record {
    Record::new("mironal", 17)
}

pub fn record_ryohey() -> Record {
    Record::new("ryohey", 17)
}

pub fn record_yanac() -> Record {
    Record::new("yanac", 17)
}

pub fn record_numa08() -> Record {
    Record::new("numa08", 7)
}

/// The sample roster in fetch order.
pub fn employees() -> Vec<Record> {
    vec![
        record_takkumattsu(),
        record_mironal(),
        record_ryohey(),
        record_yanac(),
        record_numa08(),
    ]
}

/// [`employees`] as published with the default decorations.
pub fn employee_rows() -> Vec<DisplayRow> {
    vec![
        DisplayRow::new("numa08様", "7ちゃい"),
        DisplayRow::new("mironal様", "17ちゃい"),
        DisplayRow::new("ryohey様", "17ちゃい"),
        DisplayRow::new("yanac様", "17ちゃい"),
        DisplayRow::new("takkumattsu様", "37ちゃい"),
    ]
}
