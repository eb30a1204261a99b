use super::lexicon::Lexicon;

const MAX_SECONDARY: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub primary: String,
    pub secondary: Vec<String>,
}

/// Keyword score per category, in lexicon order.
pub fn scores(title: &str, text: &str, lexicon: &Lexicon) -> Vec<(String, usize)> {
    let combined = format!("{}{}", title, text).to_lowercase();
    lexicon
        .topics
        .iter()
        .map(|topic| {
            let score: usize = topic
                .keywords
                .iter()
                .filter(|kw| !kw.is_empty())
                .map(|kw| combined.matches(kw.to_lowercase().as_str()).count())
                .sum();
            (topic.name.clone(), score)
        })
        .collect()
}

/// Primary is the first category with the highest score, so an all-zero
/// document lands in the first category. Secondary keeps lexicon order.
pub fn classify_topic(title: &str, text: &str, lexicon: &Lexicon) -> Classification {
    let scored = scores(title, text, lexicon);

    let mut primary_idx = 0;
    for (i, (_, score)) in scored.iter().enumerate() {
        if *score > scored[primary_idx].1 {
            primary_idx = i;
        }
    }
    let primary = scored
        .get(primary_idx)
        .map(|(name, _)| name.clone())
        .unwrap_or_default();

    let secondary = scored
        .iter()
        .enumerate()
        .filter(|(i, (_, score))| *score > 0 && *i != primary_idx)
        .map(|(_, (name, _))| name.clone())
        .take(MAX_SECONDARY)
        .collect();

    Classification { primary, secondary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(title: &str, text: &str) -> Classification {
        classify_topic(title, text, &Lexicon::default())
    }

    #[test]
    fn zero_scores_default_to_first_category() {
        let c = classify("", "");
        assert_eq!(c.primary, "研究生壓力");
        assert!(c.secondary.is_empty());
        assert_eq!(classify("", ""), c);
    }

    #[test]
    fn highest_score_wins() {
        let c = classify("好焦慮", "壓力好大，每天失眠又想哭。");
        assert_eq!(c.primary, "心理健康與情緒");
        assert!(c.secondary.is_empty());
    }

    #[test]
    fn overlapping_keywords_each_count() {
        // "研究所" also contains "研究": scores 2 for one occurrence.
        let s = scores("", "研究所", &Lexicon::default());
        assert_eq!(s[0].1, 2);
        // "孤獨" is listed twice in its category.
        let s = scores("", "孤獨", &Lexicon::default());
        assert_eq!(s[2].1, 2);
    }

    #[test]
    fn ties_go_to_declaration_order() {
        // One hit each for 研究生壓力 ("碩士") and 求職 ("面試").
        let c = classify("", "面試碩士");
        assert_eq!(c.primary, "研究生壓力");
        assert_eq!(c.secondary, vec!["求職與生涯規劃".to_string()]);
    }

    #[test]
    fn secondary_is_table_order_and_capped() {
        let text = "焦慮 朋友 休學 休學 休學 宿舍 工作 碩士";
        let c = classify("", text);
        assert_eq!(c.primary, "教育決策（休學/轉學/輔系）");
        assert_eq!(
            c.secondary,
            vec![
                "研究生壓力".to_string(),
                "心理健康與情緒".to_string(),
                "人際與孤獨".to_string(),
            ]
        );
    }

    #[test]
    fn title_counts_too() {
        let c = classify("想轉學", "");
        assert_eq!(c.primary, "教育決策（休學/轉學/輔系）");
    }
}
