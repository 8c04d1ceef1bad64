//! 工作日曆模型（週一到週五為工作日，不含節假日）

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PlannerError, Result};

/// 工作日曆
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendar {
    /// 日曆ID
    pub calendar_id: String,
}

impl WorkCalendar {
    /// 創建新的工作日曆
    pub fn new(calendar_id: String) -> Self {
        Self { calendar_id }
    }

    /// 檢查是否為工作日（週六、週日以外）
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// 將（可能帶小數的）工作天數無條件進位為整數天
    ///
    /// 這是唯一的進位規則，日曆推算、完工預估與排程共用。
    /// 小於等於 0 的天數視為 0。
    pub fn whole_work_days(work_days: Decimal) -> Result<u32> {
        if work_days <= Decimal::ZERO {
            return Ok(0);
        }

        work_days
            .ceil()
            .to_u32()
            .ok_or_else(|| PlannerError::InvalidDate(format!("工作天數超出可推算範圍: {}", work_days)))
    }

    /// 計算工作日（向前推算整數天）
    ///
    /// 從 `start_date` 的隔天開始逐日前進，只有週一到週五才計入天數。
    /// `days` 為 0 時直接返回 `start_date`。
    pub fn add_whole_business_days(&self, start_date: NaiveDate, days: u32) -> Result<NaiveDate> {
        let mut current = start_date;
        let mut remaining = days;

        while remaining > 0 {
            current = current
                .succ_opt()
                .ok_or_else(|| PlannerError::InvalidDate(format!("日期溢出: {}", current)))?;
            if self.is_business_day(current) {
                remaining -= 1;
            }
        }

        Ok(current)
    }

    /// 計算工作日（向前推算，工作天數可帶小數）
    ///
    /// # 範例
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    /// use textile_core::WorkCalendar;
    ///
    /// let calendar = WorkCalendar::default();
    /// let monday = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
    ///
    /// // 2400 / 550 = 4.36 天，進位為 5 個工作日，跳過週末落在下週一
    /// let days = Decimal::from(2400) / Decimal::from(550);
    /// let end = calendar.add_business_days(monday, days).unwrap();
    /// assert_eq!(end, NaiveDate::from_ymd_opt(2025, 10, 13).unwrap());
    /// ```
    pub fn add_business_days(&self, start_date: NaiveDate, work_days: Decimal) -> Result<NaiveDate> {
        let days = Self::whole_work_days(work_days)?;
        self.add_whole_business_days(start_date, days)
    }

    /// 獲取下一個工作日
    pub fn next_business_day(&self, date: NaiveDate) -> Result<NaiveDate> {
        self.add_whole_business_days(date, 1)
    }
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::new("DEFAULT".to_string())
    }
}
