use windrose::{Selection, Windrose, WindroseError};

#[tokio::main]
async fn main() -> Result<(), WindroseError> {
    let client = Windrose::new().await?;
    let selection = Selection::default();
    let report = client.fetch_selection(&selection).await?;

    println!("{}", report.records.site);
    println!(
        "{} hours, {} missing, {} above {} kn",
        report.records.len(),
        report.records.skipped_hours,
        report.table.total(),
        report.table.min_speed()
    );

    for (bucket, rows) in report.table.partitions() {
        println!("\n{} ({} hours)", bucket.title(), report.table.total_in(bucket));
        for row in rows {
            println!(
                "  {:>3} {:>3} kn  {}",
                row.compass_point.label(),
                row.speed_bucket,
                row.count
            );
        }
    }

    Ok(())
}
