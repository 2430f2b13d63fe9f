//! Console banner output

use crate::config::Config;

/// Width of every key written by the benchmark, in bytes
pub const KEY_SIZE: usize = 16;

/// Print the environment and sizing banner before the first workload
pub fn print_header(config: &Config) {
    print_environment();
    println!("Keys:       {KEY_SIZE} bytes each");
    println!("Values:     {} bytes each", config.value_size);
    println!("Entries:    {}", config.num);
    println!(
        "RawSize:    {:.1} MB (estimated)",
        ((KEY_SIZE + config.value_size) as u64 * config.num as u64) as f64 / 1_048_576.0
    );
    #[cfg(debug_assertions)]
    println!("WARNING: Assertions are enabled: benchmarks unnecessarily slow");
    println!("------------------------------------------------");
}

/// Print library version, date and host CPU details to stderr
fn print_environment() {
    eprintln!("SQLite:     version {}", rusqlite::version());
    eprintln!("Date:       {}", chrono::Local::now().format("%a %b %e %H:%M:%S %Y"));

    let cpus = num_cpus::get();
    match read_cpu_info() {
        Some(cpu) => {
            eprintln!("CPU:        {cpus} * {}", cpu.model);
            if !cpu.cache_size.is_empty() {
                eprintln!("CPUCache:   {}", cpu.cache_size);
            }
        }
        None => eprintln!("CPU:        {cpus}"),
    }
}

struct CpuInfo {
    model: String,
    cache_size: String,
}

#[cfg(target_os = "linux")]
fn read_cpu_info() -> Option<CpuInfo> {
    let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").ok()?;
    let mut model = String::new();
    let mut cache_size = String::new();
    for line in cpuinfo.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "model name" => model = value.trim().to_string(),
            "cache size" => cache_size = value.trim().to_string(),
            _ => {}
        }
    }
    if model.is_empty() {
        return None;
    }
    Some(CpuInfo { model, cache_size })
}

#[cfg(not(target_os = "linux"))]
fn read_cpu_info() -> Option<CpuInfo> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_header_runs() {
        // Smoke test: the banner must not panic on any host
        print_header(&Config::default());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_cpu_info_cache_is_trimmed() {
        if let Some(cpu) = read_cpu_info() {
            assert!(!cpu.model.starts_with(' '));
            assert!(!cpu.cache_size.starts_with(' '));
        }
    }
}
