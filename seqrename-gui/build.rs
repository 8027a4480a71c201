fn main() {
    // Only run on Windows builds
    #[cfg(windows)]
    {
        let mut res = winres::WindowsResource::new();

        res.set("ProductName", "seqrename");
        res.set("FileDescription", "seqrename - Sequential File Renamer");

        // Compile the resource file
        res.compile().expect("Failed to compile Windows resources");
    }
}
