//! head table merging

use std::result;

use chrono::Utc;
use font_types::LongDateTime;
use read_fonts::{TableProvider, tables::head::Head as ReadHead};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{head::Head, loca::LocaFormat},
};

use crate::{
    Result,
    context::MergeContext,
    strategies::{max, min},
};

/// Seconds between the OpenType epoch (1904-01-01) and the Unix epoch
const EPOCH_OFFSET_SECS: i64 = 2_082_844_800;

pub fn merge_head(ctx: &MergeContext, loca_format: LocaFormat) -> Result<Head> {
    let base = ctx.base().head()?;
    let donors: Vec<ReadHead> =
        ctx.donor_fonts().map(|f| f.head()).collect::<result::Result<_, _>>()?;

    let x_mins: Vec<i16> = donors.iter().map(|t| t.x_min()).collect();
    let y_mins: Vec<i16> = donors.iter().map(|t| t.y_min()).collect();
    let x_maxs: Vec<i16> = donors.iter().map(|t| t.x_max()).collect();
    let y_maxs: Vec<i16> = donors.iter().map(|t| t.y_max()).collect();

    let mut head: Head = base.to_owned_table();
    head.x_min = min(base.x_min(), &x_mins);
    head.y_min = min(base.y_min(), &y_mins);
    head.x_max = max(base.x_max(), &x_maxs);
    head.y_max = max(base.y_max(), &y_maxs);
    head.checksum_adjustment = 0;
    head.index_to_loc_format = match loca_format {
        LocaFormat::Short => 0,
        LocaFormat::Long => 1,
    };

    if ctx.options().recalc_timestamp {
        head.modified = now();
    }

    Ok(head)
}

fn now() -> LongDateTime {
    LongDateTime::new(Utc::now().timestamp() + EPOCH_OFFSET_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_after_2024() {
        // 2024-01-01T00:00:00Z in OpenType time
        assert!(now().as_secs() > 1_704_067_200 + EPOCH_OFFSET_SECS);
    }
}
