//! 排產配置模型

use serde::{Deserialize, Serialize};

use crate::{ModuleId, PlannerError, Result, WorkCalendar};

/// 排產配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// 工廠ID
    pub plant_id: String,

    /// 可用的生產模組（產線/班組）
    pub modules: Vec<ModuleId>,

    /// 工作日曆ID
    pub calendar_id: String,
}

impl PlannerConfig {
    /// 創建新的排產配置（預設模組 1 到 4）
    pub fn new(plant_id: String) -> Self {
        Self {
            plant_id,
            modules: (1..=4).map(ModuleId).collect(),
            calendar_id: "DEFAULT".to_string(),
        }
    }

    /// 建構器模式：設置生產模組
    pub fn with_modules(mut self, modules: Vec<ModuleId>) -> Self {
        self.modules = modules;
        self
    }

    /// 建構器模式：設置工作日曆
    pub fn with_calendar_id(mut self, calendar_id: String) -> Self {
        self.calendar_id = calendar_id;
        self
    }

    /// 從 JSON 載入配置
    ///
    /// ```
    /// # use textile_core::{ModuleId, PlannerConfig};
    /// let config = PlannerConfig::from_json_str(
    ///     r#"{ "plant_id": "PLANTA-1", "modules": [1, 2], "calendar_id": "L-V" }"#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.modules, vec![ModuleId(1), ModuleId(2)]);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PlannerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 檢查配置有效性
    pub fn validate(&self) -> Result<()> {
        if self.modules.is_empty() {
            return Err(PlannerError::Config("至少需要一個生產模組".to_string()));
        }

        let mut seen = self.modules.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.modules.len() {
            return Err(PlannerError::Config("生產模組重複".to_string()));
        }

        Ok(())
    }

    /// 檢查模組是否存在
    pub fn check_module(&self, module: ModuleId) -> Result<()> {
        if self.modules.contains(&module) {
            Ok(())
        } else {
            Err(PlannerError::InvalidModule(module))
        }
    }

    /// 依配置建立工作日曆
    pub fn calendar(&self) -> WorkCalendar {
        WorkCalendar::new(self.calendar_id.clone())
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new("DEFAULT".to_string())
    }
}
