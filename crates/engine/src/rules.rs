use consent_text::normalize_loose;

/// Category names attached to classified changes.
pub mod category {
    pub const COLLECTION_EXPANDED: &str = "Data collection expanded";
    pub const COLLECTION_REDUCED: &str = "Data collection reduced";
    pub const RETENTION: &str = "Data retention & storage";
    pub const SHARING: &str = "Data sharing & third parties";
    pub const RIGHTS: &str = "User rights & controls";
    pub const PURPOSE: &str = "Purpose & legal basis";
    pub const SECURITY: &str = "Security & safety measures";
    pub const BILLING: &str = "Billing & financial terms";
    pub const SAFEGUARDS: &str = "Profiling limitations & safeguards";
    pub const TRACKING: &str = "Tracking, analytics & profiling";
    pub const OTHER: &str = "Other policy change";
}

/// Classifier output for one sentence pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub category: String,
    pub explanation: String,
    pub suggested_action: String,
}

impl Verdict {
    fn new(category: &str, explanation: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            explanation: explanation.into(),
            suggested_action: action.into(),
        }
    }
}

/// Case-folded and loosely-normalized views of a sentence pair, prepared
/// once and shared by every rule predicate.
struct RuleInput {
    old_lower: String,
    new_lower: String,
    old_norm: String,
    new_norm: String,
}

impl RuleInput {
    fn new(old: &str, new: &str) -> Self {
        let old_lower = old.to_lowercase();
        let new_lower = new.to_lowercase();
        let old_norm = normalize_loose(&old_lower);
        let new_norm = normalize_loose(&new_lower);
        Self {
            old_lower,
            new_lower,
            old_norm,
            new_norm,
        }
    }

    /// Keyword present in the new side only.
    fn introduced(&self, keywords: &[&str]) -> bool {
        contains_any(&self.new_lower, keywords) && !contains_any(&self.old_lower, keywords)
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

const COLLECTION_MARKERS: &[&str] = &[
    "we collect",
    "we may collect",
    "information we collect",
    "data we collect",
    "we process information",
    "we may process information",
    "information we receive",
    "we receive information",
    "data we receive",
    "information we log",
    "log data",
    "log information",
];

const SENSITIVE_FIELDS: &[&str] = &[
    "phone number",
    "location",
    "gps",
    "geolocation",
    "device id",
    "device identifier",
    "ip address",
    "contact list",
    "contacts",
    "payment information",
    "credit card",
    "debit card",
    "browsing history",
    "search history",
    "usage data",
    "usage information",
    "metadata",
    "biometric",
    "face recognition",
    "face data",
    "government id",
    "passport number",
    "national id",
    "date of birth",
];

const RETENTION_KEYWORDS: &[&str] = &[
    "retain your data",
    "retain personal data",
    "retention period",
    "stored for",
    "we retain information",
    "we retain your information",
    "as long as necessary",
    "for as long as necessary",
    "for as long as you have an account",
];

const SHARING_KEYWORDS: &[&str] = &[
    "share your information",
    "share information",
    "share data",
    "disclose your information",
    "disclose information",
    "disclose data",
    "provide information to",
    "provide your information to",
    "third parties",
    "third-party",
    "third party",
    "partners",
    "affiliates",
    "service providers",
    "vendors",
    "processors",
    "advertising partners",
    "ad partners",
    "analytics providers",
    "social media partners",
    "data brokers",
    "measurement partners",
    "business partners",
    "other companies in our group",
    "group companies",
    "sell your data",
    "sell your personal data",
    "sell personal information",
    "monetize your data",
    "monetise your data",
];

/// Matched against the loosely-normalized form so straight and curly
/// apostrophes, stray punctuation, and casing never hide the phrase.
const NO_SELL_PHRASES: &[&str] = &[
    "we dont sell your personal data",
    "we do not sell your personal data",
    "we dont sell your personal information",
    "we do not sell your personal information",
    "we never sell your personal data",
    "we never sell your personal information",
];

const RIGHTS_KEYWORDS: &[&str] = &[
    "you have the right to",
    "you have certain rights",
    "your privacy rights",
    "data subject rights",
    "your rights and choices",
    "you may opt out",
    "you can opt out",
    "you may opt-out",
    "you can opt-out",
    "you can access",
    "you may access",
    "you can delete",
    "you may delete",
    "you can request deletion",
    "you can request erasure",
    "right to erasure",
    "right to deletion",
    "you can download your data",
    "you may download your data",
    "you can port your data",
    "data portability",
    "you can object",
    "you may object",
    "you can restrict processing",
    "restriction of processing",
    "withdraw your consent",
    "you can withdraw your consent",
];

const PURPOSE_KEYWORDS: &[&str] = &[
    "for advertising",
    "for targeted advertising",
    "for marketing",
    "for analytics",
    "for measurement",
    "for research",
    "for research purposes",
    "to personalise content",
    "to personalize content",
    "for personalised content",
    "for personalized content",
    "for personalisation",
    "to provide personalised services",
    "for safety and integrity",
    "to improve our services",
    "to develop new services",
    "advertising",
    "targeted ads",
    "personalised ads",
    "personalized ads",
    "analytics",
    "measurement",
    "ad effectiveness",
    "legitimate interests",
    "our legitimate interests",
    "legal obligation",
    "comply with legal obligations",
    "contractual necessity",
    "performance of a contract",
];

const SECURITY_KEYWORDS: &[&str] = &[
    "encryption",
    "encrypted",
    "encrypt",
    "secure",
    "security measures",
    "technical and organisational measures",
    "technical and organizational measures",
    "two-factor authentication",
    "2fa",
    "multi-factor authentication",
    "access controls",
    "access control",
    "logging",
    "monitoring",
    "intrusion detection",
    "firewalls",
    "security protocols",
    "industry-standard security",
    "safeguards",
    "security practices",
    "security controls",
];

const BILLING_KEYWORDS: &[&str] = &[
    "subscription",
    "subscription fee",
    "subscription plan",
    "billing",
    "billing cycle",
    "billing period",
    "charged",
    "will be charged",
    "charge your",
    "charge you",
    "payment",
    "payment method",
    "payment card",
    "credit card",
    "debit card",
    "invoice",
    "invoices",
    "pricing",
    "price",
    "prices",
    "fees",
    "service fee",
];

/// Subset of billing vocabulary that signals actual financial terms rather
/// than an incidental mention.
const STRONG_BILLING_KEYWORDS: &[&str] = &[
    "subscription",
    "subscription fee",
    "billing",
    "billing cycle",
    "billing period",
    "charged",
    "will be charged",
    "charge your",
    "charge you",
    "pricing",
    "price",
    "prices",
    "fees",
    "service fee",
    "payment",
];

const NON_PROFILING_PHRASES: &[&str] = &[
    "we do not engage in profiling",
    "we do not profile",
    "we do not use profiling",
    "we do not make decisions based solely on automated processing",
    "no automated decision-making that produces legal or similarly significant effects",
];

const TRACKING_KEYWORDS: &[&str] = &[
    "cookies",
    "pixels",
    "web beacons",
    "tracking technologies",
    "device identifiers",
    "device identifier",
    "browser fingerprints",
    "unique identifiers",
    "usage information",
    "usage data",
    "interaction data",
    "how you use our services",
    "how you use the service",
    "engagement",
    "page views",
    "pages visited",
    "pages you visit",
    "links clicked",
    "requested url",
    "session data",
    "session information",
    "search terms",
    "search queries",
    "ad interactions",
    "interaction with ads",
    "content interactions",
    "viewing history",
    "click history",
    "personalization",
    "personalisation",
    "personalized recommendations",
    "personalised recommendations",
    "profile building",
    "profiling",
    "inferred information",
    "inference",
    "preferences based on your activity",
    "location data",
    "geolocation",
    "gps",
    "precise location",
    "approximate location",
    "bluetooth",
    "wifi",
    "ip address",
];

/// Matched against the loosely-normalized form, same as the no-sell
/// phrases.
const NO_PRECISE_LOCATION_PHRASES: &[&str] = &[
    "we dont track your precise location",
    "we do not track your precise location",
    "we dont track your exact location",
    "we do not track your exact location",
];

fn collection_expanded(input: &RuleInput) -> Option<Verdict> {
    if !contains_any(&input.new_lower, COLLECTION_MARKERS)
        && !contains_any(&input.old_lower, COLLECTION_MARKERS)
    {
        return None;
    }

    let newly_added: Vec<&str> = SENSITIVE_FIELDS
        .iter()
        .copied()
        .filter(|f| input.new_lower.contains(f) && !input.old_lower.contains(f))
        .collect();
    if newly_added.is_empty() {
        return None;
    }

    Some(Verdict::new(
        category::COLLECTION_EXPANDED,
        format!(
            "The policy indicates that additional types of personal or usage data are now collected, including: {}.",
            newly_added.join(", ")
        ),
        "Review whether you are comfortable with these new types of data being collected. \
         If not, adjust your privacy settings or limit the information you provide.",
    ))
}

fn collection_reduced(input: &RuleInput) -> Option<Verdict> {
    if !contains_any(&input.new_lower, COLLECTION_MARKERS)
        && !contains_any(&input.old_lower, COLLECTION_MARKERS)
    {
        return None;
    }

    let newly_removed: Vec<&str> = SENSITIVE_FIELDS
        .iter()
        .copied()
        .filter(|f| input.old_lower.contains(f) && !input.new_lower.contains(f))
        .collect();
    if newly_removed.is_empty() {
        return None;
    }

    Some(Verdict::new(
        category::COLLECTION_REDUCED,
        format!(
            "The policy suggests that some types of personal data are no longer collected, including: {}.",
            newly_removed.join(", ")
        ),
        "This may reduce the amount of personal data processed. \
         You can still review the policy to confirm how your remaining data is used.",
    ))
}

fn retention_period_changed(input: &RuleInput) -> Option<Verdict> {
    if !input.old_lower.contains("stored for") || !input.new_lower.contains("stored for") {
        return None;
    }

    let old_num = first_number(&input.old_lower)?;
    let new_num = first_number(&input.new_lower)?;
    if old_num == new_num {
        return None;
    }

    Some(Verdict::new(
        category::RETENTION,
        format!(
            "The period your data is stored appears to have changed from {old_num} months to {new_num} months."
        ),
        "Consider whether you are comfortable with this storage duration. \
         Check if you can delete older data or request data erasure.",
    ))
}

fn retention_introduced(input: &RuleInput) -> Option<Verdict> {
    if !input.introduced(RETENTION_KEYWORDS) {
        return None;
    }

    Some(Verdict::new(
        category::RETENTION,
        "The updated policy introduces or clarifies how long your personal data is retained.",
        "Review whether the retention period is acceptable to you and check if you have options \
         to delete data or close your account.",
    ))
}

fn no_sell_confirmed(input: &RuleInput) -> Option<Verdict> {
    if !contains_any(&input.new_norm, NO_SELL_PHRASES) {
        return None;
    }

    Some(Verdict::new(
        category::SHARING,
        "The policy confirms that your personal data is not sold to third parties, including data brokers. \
         This maintains or clarifies an existing protection against the sale of your personal data.",
        "You may still wish to review how your data is shared with partners or service providers for \
         non-selling purposes such as analytics or advertising.",
    ))
}

fn no_sell_removed(input: &RuleInput) -> Option<Verdict> {
    if !contains_any(&input.old_norm, NO_SELL_PHRASES)
        || contains_any(&input.new_norm, NO_SELL_PHRASES)
    {
        return None;
    }

    Some(Verdict::new(
        category::SHARING,
        "A previous statement that your personal data would not be sold to third parties no longer appears in the policy. \
         This may signal a change in how your data can be monetised or shared.",
        "Review the updated sharing and monetisation terms carefully and check whether you can limit certain types \
         of data sharing or advertising in your account settings.",
    ))
}

fn sharing_introduced(input: &RuleInput) -> Option<Verdict> {
    if !input.introduced(SHARING_KEYWORDS) {
        return None;
    }

    Some(Verdict::new(
        category::SHARING,
        "The updated policy indicates that your data may now be shared with additional third parties, such as partners, \
         advertisers, service providers, or group companies.",
        "Check which third parties are involved and whether you can opt out of certain types of sharing or limit data \
         transfers in your account settings.",
    ))
}

fn advertising_partners_named(input: &RuleInput) -> Option<Verdict> {
    if !input.introduced(&["advertising partners"]) {
        return None;
    }

    Some(Verdict::new(
        category::SHARING,
        "Your usage data may now be shared specifically with advertising partners.",
        "Review your advertising preferences and, if desired, opt out of personalised ads or tracking.",
    ))
}

fn rights_added(input: &RuleInput) -> Option<Verdict> {
    if !input.introduced(RIGHTS_KEYWORDS) {
        return None;
    }

    Some(Verdict::new(
        category::RIGHTS,
        "The updated policy describes additional rights or controls you have over your personal data, such as new ways \
         to opt out, delete your data, or exercise privacy rights.",
        "Review the available rights and consider whether you wish to exercise any of them, for example by requesting \
         data deletion or adjusting consent settings.",
    ))
}

fn purpose_expanded(input: &RuleInput) -> Option<Verdict> {
    if !input.introduced(PURPOSE_KEYWORDS) {
        return None;
    }

    Some(Verdict::new(
        category::PURPOSE,
        "The updated policy introduces or expands the purposes for which your data is used (e.g., advertising, analytics, \
         research, or security) or clarifies the legal basis for processing.",
        "Check whether you are comfortable with these purposes and, where applicable, adjust your consent or opt-out preferences.",
    ))
}

fn security_added(input: &RuleInput) -> Option<Verdict> {
    if !input.introduced(SECURITY_KEYWORDS) {
        return None;
    }

    Some(Verdict::new(
        category::SECURITY,
        "The updated policy describes new or enhanced security measures to protect your data, such as encryption, access \
         controls, or monitoring.",
        "This may improve protection of your data. You can still review details to understand what changed.",
    ))
}

fn billing_introduced(input: &RuleInput) -> Option<Verdict> {
    if !input.introduced(BILLING_KEYWORDS) {
        return None;
    }
    if !contains_any(&input.new_lower, STRONG_BILLING_KEYWORDS) {
        return None;
    }

    Some(Verdict::new(
        category::BILLING,
        "The updated policy introduces or changes billing/payment-related terms (subscriptions, fees, pricing, or payment methods).",
        "Review these financial terms carefully to understand any new costs or obligations.",
    ))
}

fn non_profiling_safeguard(input: &RuleInput) -> Option<Verdict> {
    if !input.introduced(NON_PROFILING_PHRASES) {
        return None;
    }

    Some(Verdict::new(
        category::SAFEGUARDS,
        "The updated policy explicitly limits profiling or automated decision-making that could significantly affect you, \
         which generally strengthens your protections.",
        "This appears protective. You may still review how data is used for personalisation or recommendations.",
    ))
}

fn location_reassurance_removed(input: &RuleInput) -> Option<Verdict> {
    if !contains_any(&input.old_norm, NO_PRECISE_LOCATION_PHRASES)
        || contains_any(&input.new_norm, NO_PRECISE_LOCATION_PHRASES)
    {
        return None;
    }

    Some(Verdict::new(
        category::TRACKING,
        "A previous reassurance that your precise location is not tracked appears to have been removed. \
         This may indicate broader or more granular location tracking.",
        "Review location/tracking terms and consider restricting location access in device settings.",
    ))
}

fn tracking_expanded(input: &RuleInput) -> Option<Verdict> {
    if !input.introduced(TRACKING_KEYWORDS) {
        return None;
    }

    Some(Verdict::new(
        category::TRACKING,
        "The updated policy indicates expanded tracking or behavioural analytics (e.g., interactions, pages visited, search terms, \
         click activity, or location) which may be used for personalisation or profiling.",
        "Review privacy settings to limit tracking/analytics. Consider disabling personalised ads, restricting cookies, or using privacy tools \
         if concerned about behavioural profiling.",
    ))
}

fn first_number(text: &str) -> Option<u64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

type RuleFn = fn(&RuleInput) -> Option<Verdict>;

struct Rule {
    name: &'static str,
    check: RuleFn,
}

/// The classification chain. Order is the priority: more specific rules
/// sit above the generic ones, and the first match wins.
const RULES: &[Rule] = &[
    Rule { name: "collection-expanded", check: collection_expanded },
    Rule { name: "collection-reduced", check: collection_reduced },
    Rule { name: "retention-period-changed", check: retention_period_changed },
    Rule { name: "retention-introduced", check: retention_introduced },
    Rule { name: "no-sell-confirmed", check: no_sell_confirmed },
    Rule { name: "no-sell-removed", check: no_sell_removed },
    Rule { name: "sharing-introduced", check: sharing_introduced },
    Rule { name: "advertising-partners-named", check: advertising_partners_named },
    Rule { name: "rights-added", check: rights_added },
    Rule { name: "purpose-expanded", check: purpose_expanded },
    Rule { name: "security-added", check: security_added },
    Rule { name: "billing-introduced", check: billing_introduced },
    Rule { name: "non-profiling-safeguard", check: non_profiling_safeguard },
    Rule { name: "location-reassurance-removed", check: location_reassurance_removed },
    Rule { name: "tracking-expanded", check: tracking_expanded },
];

/// Classify one sentence pair. Either side may be empty (additions and
/// removals). Pure function; rules see case-folded and loosely-normalized
/// views and the first matching rule wins.
#[must_use]
pub fn classify(old: &str, new: &str) -> Verdict {
    let input = RuleInput::new(old, new);

    for rule in RULES {
        if let Some(verdict) = (rule.check)(&input) {
            log::debug!("rule '{}' matched -> {}", rule.name, verdict.category);
            return verdict;
        }
    }

    Verdict::new(
        category::OTHER,
        "This section of the policy text has been modified.",
        "Read this part of the policy carefully to understand how it affects your data.",
    )
}
