//! Constructor selection heuristic.

use smallvec::SmallVec;

use crate::activation::injectable::{Constructor, Parameter};
use crate::container::ResolutionContext;

/// Picks the constructor to invoke for the current resolution.
///
/// Prefers the richest constructor that the registered dependencies and the
/// supplied arguments can fully satisfy. Selection itself never fails: when
/// nothing matches, the constructor with the fewest parameters is returned and
/// any truly missing dependency surfaces during activation.
pub struct ConstructorSelector;

impl ConstructorSelector {
    /// Returns `None` only when `constructors` is empty.
    pub fn select<'c, T>(
        constructors: &'c [Constructor<T>],
        context: &ResolutionContext<'_>,
    ) -> Option<&'c Constructor<T>> {
        // Stable sort keeps declaration order among equal arities.
        let mut ordered: SmallVec<[&Constructor<T>; 4]> = constructors.iter().collect();
        ordered.sort_by(|a, b| b.arity().cmp(&a.arity()));

        let fallback = *ordered.last()?;
        if ordered.len() == 1 {
            return Some(fallback);
        }

        let arguments = context.arguments();
        let runtime_arguments = context.runtime_arguments();
        let supplied = arguments.count() + runtime_arguments.count();

        for candidate in ordered {
            let parameters = candidate.parameters();
            let satisfiable: SmallVec<[bool; 8]> = parameters
                .iter()
                .map(|p| context.is_registered_as_anything(&p.contract()))
                .collect();
            let dependency_count = satisfiable.iter().filter(|s| **s).count();

            if supplied == 0 {
                if dependency_count == parameters.len() {
                    return Some(Self::chosen(candidate, context));
                }
                continue;
            }

            if supplied >= parameters.len() - dependency_count {
                let covered = parameters.iter().zip(&satisfiable).all(|(p, dep)| {
                    *dep || arguments.can_supply(p) || runtime_arguments.can_supply(p)
                });
                if covered {
                    return Some(Self::chosen(candidate, context));
                }
            }
        }

        tracing::debug!(
            implementation = context.implementation().name(),
            arity = fallback.arity(),
            "no constructor fully satisfiable, falling back to the smallest"
        );
        Some(fallback)
    }

    fn chosen<'c, T>(candidate: &'c Constructor<T>, context: &ResolutionContext<'_>) -> &'c Constructor<T> {
        tracing::trace!(
            implementation = context.implementation().name(),
            parameters = ?candidate.parameters().iter().map(Parameter::name).collect::<Vec<_>>(),
            "constructor selected"
        );
        candidate
    }
}
