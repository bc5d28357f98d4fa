pub(crate) mod date;
pub(crate) mod timezone;

pub(crate) use date::{parse_amount, parse_date, parse_decimal, parse_time};
pub(crate) use timezone::Timezone;
