//! Transfer coupon command - decodes a transfer coupon and prints it as JSON

use clap::Args;

use crate::domain::TransferCoupon;

/// Arguments for the transfer-coupon command
#[derive(Args, Clone)]
pub struct TransferCouponArgs {
    /// Coupon string, e.g. mari://xfer?from=...&to=...&val=...&g=...&exp=...&s=...
    pub value: String,
}

/// Run the transfer-coupon command
pub fn run(args: TransferCouponArgs) -> anyhow::Result<()> {
    let coupon = TransferCoupon::parse(&args.value)?;
    println!("{}", serde_json::to_string_pretty(&coupon)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_accepts_coupon() {
        let args = TransferCouponArgs {
            value: "Mari://xfer?from=9a3f&to=00ff&val=1&g=A1B2C3D4&exp=10&s=S".to_string(),
        };
        assert!(run(args).is_ok());
    }

    #[test]
    fn test_run_rejects_function_id() {
        let args = TransferCouponArgs {
            value: "mari://v1?g=G&b=B&rc=1&tm=2&seal=S".to_string(),
        };
        assert!(run(args).is_err());
    }
}
