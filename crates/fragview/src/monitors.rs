use anyhow::Result;
use renderer::enumerate_monitors;

/// Prints the monitors the windowing system reports, one line per monitor.
pub fn list_monitors() -> Result<()> {
    let monitors = enumerate_monitors()?;
    if monitors.is_empty() {
        println!("No monitors reported by the windowing system.");
        return Ok(());
    }

    println!(
        "{:<7} {:<28} {:<12} {:<9} {}",
        "Index", "Name", "Resolution", "Refresh", "Scale"
    );
    for (index, monitor) in monitors.iter().enumerate() {
        let refresh = monitor
            .refresh_rate_millihertz
            .map(|mhz| format!("{}Hz", mhz / 1_000))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<7} {:<28} {:<12} {:<9} {:.2}",
            format!("[{index}]"),
            monitor.name.as_deref().unwrap_or("(unnamed)"),
            format!("{}x{}", monitor.width, monitor.height),
            refresh,
            monitor.scale_factor
        );
    }

    Ok(())
}
