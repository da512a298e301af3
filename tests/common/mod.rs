//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use std::path::Path;

/// GPS log content with two fixes
pub const POS_CSV: &str = "timestamp,latitude,longitude,altitude\n\
                           0.00,52.3702,4.8952,12.0\n\
                           1.00,52.3703,4.8954,12.5\n";

/// Accelerometer log content
pub const ACCEL_CSV: &str = "time,x,y,z\n0.00,0.01,-0.02,9.81\n0.01,0.02,-0.01,9.80\n";

/// Orientation log content
pub const ORIENT_CSV: &str = "time,yaw,pitch,roll\n0.00,10.0,0.5,-0.3\n";

/// Assert that a path is listed among `files`
pub fn assert_contains_path(files: &[std::path::PathBuf], path: &Path) {
    assert!(
        files.iter().any(|f| f == path),
        "Expected {:?} to be among {:?}",
        path,
        files
    );
}
