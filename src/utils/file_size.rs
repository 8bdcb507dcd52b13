pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Sizes in the staged list are always shown in kilobytes, two decimals.
    pub fn format_kilobytes(size: u64) -> String {
        format!("{:.2} KB", size as f64 / 1024.0)
    }
}
