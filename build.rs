// build.rs

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_X11");

    // Only the X11 display driver links against native libraries. Headless
    // builds (the default) need nothing from the system.
    if std::env::var_os("CARGO_FEATURE_X11").is_none() {
        return;
    }

    // Try pkg-config first; it is the standard way to find X11 on Unix-like
    // systems. Fall back to plain linker flags when the .pc file is missing.
    match pkg_config::probe_library("x11") {
        Ok(_) => {
            eprintln!("pkg-config found x11. Linking configured automatically.");
        }
        Err(e) => {
            eprintln!(
                "pkg-config failed for library 'x11' ({}). Falling back to manual linking.",
                e
            );
            println!("cargo:rustc-link-lib=X11");
            println!("cargo:rustc-link-search=/usr/lib");
        }
    }
}
