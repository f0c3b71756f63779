use shadow_rs::ShadowBuilder;

fn main() {
    // Embed git and build metadata for `metadata::log_version_info`
    ShadowBuilder::builder()
        .build()
        .expect("failed to generate build metadata");
}
