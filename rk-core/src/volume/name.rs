//! Host file name to RK-DOS file name conversion.

const MAX_NAME: usize = 10;
const MAX_EXT: usize = 3;

/// Convert a host file name to an RK-DOS file name.
///
/// - Drops any directory prefix
/// - Truncates the name to 10 chars, extension to 3 chars
/// - Replaces anything but letters, digits, space and `.` with `_`
///
/// # Examples
/// ```
/// use rk_core::to_rk_dos_name;
/// assert_eq!(to_rk_dos_name("games/xonix.rk"), "xonix.rk");
/// assert_eq!(to_rk_dos_name("VeryLongFileName.basic"), "VeryLongFi.bas");
/// assert_eq!(to_rk_dos_name("README"), "README");
/// ```
pub fn to_rk_dos_name(host_name: &str) -> String {
    let base = match host_name.rfind(['/', '\\', ':']) {
        Some(pos) => &host_name[pos + 1..],
        None => host_name,
    };

    let (name, ext) = match base.rfind('.') {
        Some(pos) => (&base[..pos], Some(&base[pos + 1..])),
        None => (base, None),
    };

    let mut result: String = name.chars().take(MAX_NAME).collect();
    if let Some(ext) = ext.filter(|e| !e.is_empty()) {
        result.push('.');
        result.extend(ext.chars().take(MAX_EXT));
    }

    result
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == ' ' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
