use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Platform chrome: navigation labels, footer links, app banners.
const NOISE: &[&str] = &[
    "下載 App",
    "所有看板",
    "即時熱門看板",
    "創作者排行榜",
    "最近造訪",
    "查看全部",
    "追蹤的看板",
    "查看所有文章",
    "Dcard 精選看板",
    "服務條款",
    "幫助中心",
    "品牌識別",
    "徵才",
    "商業合作",
    "隱私政策",
    "看板首頁",
    "回到頂部",
];

// Order matters: ties and secondary topics follow declaration order.
// "孤獨" appears twice on purpose, it is weighted double.
const TOPICS: &[(&str, &[&str])] = &[
    ("研究生壓力", &["研究所", "碩士", "碩班", "研究", "考研", "研究室"]),
    (
        "心理健康與情緒",
        &["焦慮", "壓力", "崩潰", "憂鬱", "失眠", "哭", "心理", "情緒"],
    ),
    (
        "人際與孤獨",
        &["人際", "孤獨", "朋友", "交友", "孤獨", "寂寞", "人緣"],
    ),
    (
        "教育決策（休學/轉學/輔系）",
        &["休學", "轉學", "輔系", "退學", "放棄"],
    ),
    ("校園社群與數位壓力", &["宿舍", "社群", "社團", "校園", "校隊"]),
    (
        "求職與生涯規劃",
        &["求職", "工作", "職涯", "就業", "面試", "畢業", "找工作"],
    ),
];

const CRISIS: &[&str] = &["自殺", "自傷", "自我傷害", "死", "消失", "放棄", "無法活", "想死"];
const HARASSMENT: &[&str] = &["騷擾", "侵害", "暴力", "欺凌", "霸凌"];
const MEDICAL: &[&str] = &["醫生", "藥物", "治療", "診斷", "症狀"];

const DCARD_BOARDS: &[(&str, &str)] = &[
    ("心情板", "心情"),
    ("研究所板", "研究所"),
    ("心理板", "心理"),
];

/// One topic category and the keywords that score it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub keywords: Vec<String>,
}

/// A Dcard board marker and the category name it maps to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub marker: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSets {
    pub crisis: Vec<String>,
    pub harassment: Vec<String>,
    pub medical: Vec<String>,
}

/// Every keyword table the pipeline consults. Lists are ordered and the
/// order is observable in the output, so they stay `Vec`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    pub noise: Vec<String>,
    pub topics: Vec<Topic>,
    pub risk: RiskSets,
    pub dcard_boards: Vec<Board>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Lexicon {
            noise: owned(NOISE),
            topics: TOPICS
                .iter()
                .map(|(name, kws)| Topic {
                    name: name.to_string(),
                    keywords: owned(kws),
                })
                .collect(),
            risk: RiskSets {
                crisis: owned(CRISIS),
                harassment: owned(HARASSMENT),
                medical: owned(MEDICAL),
            },
            dcard_boards: DCARD_BOARDS
                .iter()
                .map(|(marker, category)| Board {
                    marker: marker.to_string(),
                    category: category.to_string(),
                })
                .collect(),
        }
    }
}

impl Lexicon {
    /// Load a replacement lexicon from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon {}", path.display()))?;
        let lexicon: Lexicon = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid lexicon {}", path.display()))?;
        if lexicon.topics.is_empty() {
            anyhow::bail!("Lexicon {} has no topic categories", path.display());
        }
        Ok(lexicon)
    }

    /// Built-in tables unless a lexicon file is given.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn is_noise(&self, text: &str) -> bool {
        self.noise.iter().any(|kw| text.contains(kw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_topic_order_is_declaration_order() {
        let lex = Lexicon::default();
        let names: Vec<&str> = lex.topics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "研究生壓力");
        assert_eq!(names[5], "求職與生涯規劃");
    }

    #[test]
    fn noise_matches_substrings() {
        let lex = Lexicon::default();
        assert!(lex.is_noise("點此 下載 App 看更多"));
        assert!(!lex.is_noise("今天心情不好"));
    }

    #[test]
    fn load_round_trips_through_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        let mut lex = Lexicon::default();
        lex.noise.push("廣告".to_string());
        std::fs::write(&path, serde_json::to_string_pretty(&lex).unwrap()).unwrap();

        let loaded = Lexicon::load(&path).unwrap();
        assert!(loaded.is_noise("這是廣告"));
        assert_eq!(loaded.topics, Lexicon::default().topics);
    }

    #[test]
    fn load_rejects_empty_topic_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        let mut lex = Lexicon::default();
        lex.topics.clear();
        std::fs::write(&path, serde_json::to_string(&lex).unwrap()).unwrap();
        assert!(Lexicon::load(&path).is_err());
    }
}
