// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the posture assessment library

use std::sync::Arc;

use ndarray::Array2;
use posture_assessment::batch::{Frame, analyze_frames};
use posture_assessment::geometry::angle;
use posture_assessment::{
    AnalysisConfig, AnalysisStatus, AssessmentError, BodyPlan, Category, FacingSide, ItemId,
    KnowledgeBase, Label, Landmark, LandmarkDetector, LandmarkPoint, LandmarkSet, PostureAnalyzer,
    Result, RiskLevel,
};

fn analyzer(body: BodyPlan) -> PostureAnalyzer {
    PostureAnalyzer::new(
        Arc::new(body),
        Arc::new(BodyPlan::hand()),
        AnalysisConfig::default(),
    )
    .unwrap()
}

/// Build a set from a `(K, 3)` array, every point at (0.5, 0.5, 0.9) unless overridden.
fn body_set(plan: BodyPlan, overrides: &[(Landmark, f32, f32)]) -> LandmarkSet {
    let plan = Arc::new(plan);
    let mut data = Array2::<f32>::from_elem((plan.num_points(), 3), 0.5);
    data.column_mut(2).fill(0.9);
    for &(landmark, x, y) in overrides {
        let i = plan.index_of(landmark).unwrap();
        data[[i, 0]] = x;
        data[[i, 1]] = y;
    }
    LandmarkSet::from_array(plan, data.view()).unwrap()
}

/// Seated side view facing left with a 70 degree trunk angle and a 95 degree knee angle.
fn seated_forward_lean(plan: BodyPlan) -> LandmarkSet {
    body_set(
        plan,
        &[
            (Landmark::Nose, 0.40, 0.10),
            (Landmark::LeftEar, 0.42, 0.10),
            (Landmark::RightEar, 0.55, 0.10),
            (Landmark::RightShoulder, 0.6026, 0.3181),
            (Landmark::RightHip, 0.50, 0.60),
            (Landmark::RightKnee, 0.70, 0.60),
            (Landmark::RightAnkle, 0.7261, 0.8989),
        ],
    )
}

#[test]
fn test_seated_end_to_end() {
    let set = seated_forward_lean(BodyPlan::blazepose());
    let analyzer = analyzer(BodyPlan::blazepose());
    let result = analyzer.analyze_seated(&set).unwrap();
    assert_eq!(result.facing, Some(FacingSide::Left));
    assert_eq!(result.label(1), Some(Label::Positive));
    assert_eq!(result.label(2), Some(Label::Neutral));
    assert!(result.verbose().starts_with("Leaning forward.\nHip in line with legs.\n"));

    let report = analyzer.assess(KnowledgeBase::builtin().unwrap(), &[result]);
    let entries: Vec<(Category, ItemId)> = report
        .reported()
        .flat_map(|risk| risk.groups.iter())
        .flat_map(|group| group.entries.iter())
        .map(|e| (e.category, e.item_id))
        .collect();
    assert_eq!(entries, vec![(Category::SeatedPosture, ItemId(1))]);
    assert_eq!(report.group(RiskLevel::High).len(), 1);
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(
        report.recommendations[0].text,
        "Sit fully back in your chair, ensuring the backrest supports your spine."
    );
    assert!(report.skipped.is_empty());
}

#[test]
fn test_same_result_on_both_body_plans() {
    let coco = analyzer(BodyPlan::coco())
        .analyze_seated(&seated_forward_lean(BodyPlan::coco()))
        .unwrap();
    let blazepose = analyzer(BodyPlan::blazepose())
        .analyze_seated(&seated_forward_lean(BodyPlan::blazepose()))
        .unwrap();
    assert_eq!(coco.items, blazepose.items);
}

#[test]
fn test_desk_end_to_end() {
    let set = body_set(
        BodyPlan::coco(),
        &[
            (Landmark::Nose, 0.50, 0.10),
            (Landmark::LeftEar, 0.52, 0.10),
            (Landmark::RightEar, 0.65, 0.10),
            (Landmark::LeftShoulder, 0.48, 0.30),
            (Landmark::RightShoulder, 0.52, 0.30),
            (Landmark::RightElbow, 0.52, 0.50),
            (Landmark::RightWrist, 0.56, 0.32),
        ],
    );
    let analyzer = analyzer(BodyPlan::coco());
    let result = analyzer.analyze_desk(&set).unwrap();
    let labels: Vec<Label> = result.items.iter().map(|i| i.label).collect();
    assert_eq!(labels, vec![Label::Positive, Label::Neutral, Label::Neutral]);

    let report = analyzer.assess(KnowledgeBase::builtin().unwrap(), &[result]);
    let high = report.group(RiskLevel::High);
    assert_eq!(high.groups.len(), 1);
    assert_eq!(
        high.groups[0].conditions,
        "Cervical spondylosis, Thoracic outlet syndrome"
    );
    assert_eq!(report.group(RiskLevel::Low).len(), 2);
    assert_eq!(report.reported().count(), 1);
}

#[test]
fn test_noisy_landmarks_are_unusable() {
    let analyzer = analyzer(BodyPlan::coco());
    for shift in [0.0_f32, 0.1, 0.3] {
        let mut set = seated_forward_lean(BodyPlan::coco()).points().to_vec();
        for (i, p) in set.iter_mut().enumerate() {
            p.x += shift;
            if i < 14 {
                p.confidence = 0.1;
            }
        }
        let set = LandmarkSet::new(Arc::new(BodyPlan::coco()), set).unwrap();
        let result = analyzer.analyze_seated(&set).unwrap();
        assert_eq!(result.status, AnalysisStatus::Unusable);
        assert_eq!(
            result.verbose(),
            "Improper picture. Please provide a clearer image.\n"
        );
    }
}

#[test]
fn test_facing_follows_nearer_ear() {
    let cases = [(0.40, 0.42, 0.55), (0.30, 0.20, 0.31), (0.60, 0.70, 0.40)];
    for (nose, left, right) in cases {
        let p = |x: f32| LandmarkPoint::new(x, 0.1, 1.0);
        let side = FacingSide::resolve(&p(nose), &p(left), &p(right));
        let mirrored = FacingSide::resolve(&p(1.0 - nose), &p(1.0 - left), &p(1.0 - right));
        assert_ne!(side, FacingSide::Ambiguous);
        assert_eq!(side, mirrored);

        let swapped = FacingSide::resolve(&p(nose), &p(right), &p(left));
        assert_ne!(side, swapped);
    }
    let p = |x: f32| LandmarkPoint::new(x, 0.1, 1.0);
    assert_eq!(
        FacingSide::resolve(&p(0.5), &p(0.25), &p(0.75)),
        FacingSide::Ambiguous
    );
}

#[test]
fn test_angle_properties() {
    let a = LandmarkPoint::new(0.1, 0.7, 1.0);
    let b = LandmarkPoint::new(0.4, 0.3, 1.0);
    let c = LandmarkPoint::new(0.9, 0.6, 1.0);
    assert!((angle(&a, &b, &c) - angle(&c, &b, &a)).abs() < 1e-4);

    let shift = |p: &LandmarkPoint| LandmarkPoint::new(p.x + 0.25, p.y - 0.5, p.confidence);
    assert!((angle(&a, &b, &c) - angle(&shift(&a), &shift(&b), &shift(&c))).abs() < 1e-3);

    assert!(angle(&b, &b, &c).abs() < f32::EPSILON);
    assert!(angle(&a, &b, &b).abs() < f32::EPSILON);
}

#[test]
fn test_custom_knowledge_base_skips_unmapped_items() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kb.json");
    std::fs::write(
        &path,
        r#"{"categories": [{"category": "seated_posture", "items": [
            {"id": 2, "scenarios": {"neutral": {"risk": "Medium", "conditions": ["Stiffness"],
             "recommendation": "Stand up every hour."}}}
        ]}]}"#,
    )
    .unwrap();
    let kb = KnowledgeBase::load(&path).unwrap();
    assert!(kb.require_complete().is_err());

    let analyzer = analyzer(BodyPlan::coco());
    let result = analyzer
        .analyze_seated(&seated_forward_lean(BodyPlan::coco()))
        .unwrap();
    let report = analyzer.assess(&kb, &[result]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].item_id, ItemId(1));
    assert_eq!(report.group(RiskLevel::Medium).groups[0].conditions, "Stiffness");
    assert_eq!(report.recommendations.len(), 1);
}

struct StubDetector;

impl LandmarkDetector for StubDetector {
    fn detect_pose(&self, image: &[u8]) -> Result<Option<LandmarkSet>> {
        if image.is_empty() {
            return Err(AssessmentError::InvalidImage("empty image".to_string()));
        }
        Ok(Some(seated_forward_lean(BodyPlan::coco())))
    }

    fn detect_hands(&self, _image: &[u8]) -> Result<Vec<LandmarkSet>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_detector_seam() {
    let analyzer = analyzer(BodyPlan::coco());
    let assessment = analyzer
        .analyze_image(&StubDetector, Category::SeatedPosture, b"image")
        .unwrap();
    assert_eq!(assessment.body().and_then(|r| r.label(1)), Some(Label::Positive));

    let hands = analyzer
        .analyze_image(&StubDetector, Category::HandPosition, b"image")
        .unwrap();
    assert_eq!(
        hands.verbose(),
        "No hands detected. Please take another picture.\n"
    );

    assert!(analyzer
        .analyze_image(&StubDetector, Category::DeskPosition, b"")
        .is_err());
}

#[test]
fn test_batch_reports() {
    let analyzer = analyzer(BodyPlan::coco());
    let frames = vec![
        Frame::body("lean", seated_forward_lean(BodyPlan::coco())),
        Frame {
            name: "empty".to_string(),
            body: None,
            hands: Vec::new(),
        },
    ];
    let reports = analyze_frames(
        &analyzer,
        KnowledgeBase::builtin().unwrap(),
        Category::SeatedPosture,
        &frames,
    )
    .unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports[0].report.as_ref().is_some_and(|r| !r.is_clear()));
    assert!(reports[1].report.as_ref().is_some_and(|r| r.is_clear()));

    let json = serde_json::to_value(&reports).unwrap();
    assert_eq!(json[0]["name"], "lean");
    assert_eq!(json[0]["assessment"]["items"][0]["label"], "positive");
    assert_eq!(json[0]["report"]["risks"][0]["risk"], "High");
}
