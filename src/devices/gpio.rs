//! Linux sysfs GPIO lines.

use linux_embedded_hal::SysfsPin;
use linux_embedded_hal::sysfs_gpio::{self, Direction};

/// Export `pin` and set its direction. Exporting an already exported pin is
/// not an error.
pub fn export(pin: u32, direction: Direction) -> Result<SysfsPin, sysfs_gpio::Error> {
    let line = SysfsPin::new(u64::from(pin));
    line.export()?;
    line.set_direction(direction)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonexistent_pin_cannot_be_exported() {
        assert!(export(u32::MAX, Direction::In).is_err());
    }
}
