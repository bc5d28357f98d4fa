use crate::core::{Record, RecordType};
use crate::utils::{parse_date, parse_time};

pub(crate) fn record(id: i64, date: &str, time: &str, kind: RecordType) -> Record {
    Record {
        id,
        seq: id as u64,
        date: parse_date(date).unwrap(),
        time: parse_time(time).unwrap(),
        kind,
        from: String::new(),
        to: String::new(),
        distance: 0.0,
        income: 0,
        cost: 0,
        liters: 0.0,
        unit_price: 0.0,
        brand: String::new(),
        expense_item: String::new(),
        supply_item: String::new(),
        mileage: 0.0,
    }
}

pub(crate) fn trip(id: i64, date: &str, time: &str, from: &str, to: &str, km: f64, income: i64) -> Record {
    Record {
        from: from.to_string(),
        to: to.to_string(),
        distance: km,
        income,
        ..record(id, date, time, RecordType::Transport)
    }
}

pub(crate) fn fuel(id: i64, date: &str, time: &str, cost: i64, liters: f64) -> Record {
    Record {
        cost,
        liters,
        ..record(id, date, time, RecordType::FuelStop)
    }
}

pub(crate) fn expense(id: i64, date: &str, time: &str, cost: i64) -> Record {
    Record {
        cost,
        ..record(id, date, time, RecordType::GeneralExpense)
    }
}
