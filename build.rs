fn main() {
    // Only run on Windows
    #[cfg(target_os = "windows")]
    {
        // Embed version metadata into the executable
        let mut res = winresource::WindowsResource::new();
        res.set("ProductName", "OCR Scanner");
        res.set("FileDescription", "Desktop client for an OCR web service");
        res.compile().expect("Failed to compile Windows resources");
    }
}
