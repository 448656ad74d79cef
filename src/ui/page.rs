//! HTML document shell around the mount point.

/// Id of the element the dashboard markup is rendered into
pub const MOUNT_ID: &str = "root";

/// Wrap rendered dashboard markup in a full HTML document
///
/// The script registers the selector's change listener once per page load;
/// it is served from the static asset directory.
pub fn document(mount_markup: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Mars Dashboard</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css">
<link rel="stylesheet" href="/assets/style.css">
</head>
<body>
<main class="container" id="{MOUNT_ID}">{mount_markup}</main>
<script src="/assets/dashboard.js"></script>
</body>
</html>
"#
    )
}
