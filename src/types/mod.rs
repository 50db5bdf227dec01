pub mod buckets;
pub mod hourly_record;
pub mod period;
pub mod selection;
pub mod site;
pub mod wind_records;
