/// Resident set size of the current process in gigabytes, used for the
/// RAM-hours cost accounting of evaluation runs.
#[inline]
pub fn current_rss_gb() -> Option<f64> {
    #[cfg(target_os = "linux")]
    {
        rss_for_linux()
    }

    #[cfg(target_os = "macos")]
    {
        rss_for_macos()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

#[cfg(target_os = "linux")]
fn rss_for_linux() -> Option<f64> {
    use std::fs;
    let status = fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss_gb(&status)
}

#[cfg(target_os = "linux")]
fn parse_vm_rss_gb(status: &str) -> Option<f64> {
    for line in status.lines() {
        let Some(rest) = line.strip_prefix("VmRSS:") else {
            continue;
        };
        if let Some(kb) = rest.split_whitespace().find_map(|t| t.parse::<u64>().ok()) {
            return Some(kb as f64 / (1024.0 * 1024.0)); // kB -> GB
        }
    }
    None
}

#[cfg(target_os = "macos")]
fn rss_for_macos() -> Option<f64> {
    use mach2::kern_return::KERN_SUCCESS;
    use mach2::message::mach_msg_type_number_t;
    use mach2::task::task_info;
    use mach2::task_info::{MACH_TASK_BASIC_INFO, MACH_TASK_BASIC_INFO_COUNT, mach_task_basic_info};
    use mach2::traps::mach_task_self;

    unsafe {
        let mut info: mach_task_basic_info = std::mem::zeroed();
        let mut count: mach_msg_type_number_t = MACH_TASK_BASIC_INFO_COUNT;
        let kr = task_info(
            mach_task_self(),
            MACH_TASK_BASIC_INFO,
            (&mut info as *mut mach_task_basic_info).cast(),
            &mut count,
        );
        if kr == KERN_SUCCESS {
            return Some(info.resident_size as f64 / (1024.0 * 1024.0 * 1024.0));
        }
    }
    None
}
